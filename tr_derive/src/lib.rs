use std::borrow::Cow;

use proc_macro2::{Ident, Span, TokenStream};
use syn::{Attribute, Data, DataStruct, DeriveInput, Fields, FieldsNamed, FieldsUnnamed, Type};
use quote::quote;

#[derive(Default)]
struct FieldAttrs {
	/// Length prefix type of a counted list.
	list: Option<Type>,
	/// Field exists only in memory, not in the file.
	zeroed: bool,
}

fn parse_field_attrs(attrs: &[Attribute]) -> FieldAttrs {
	let mut field_attrs = FieldAttrs::default();
	for attr in attrs {
		let Some(ident) = attr.path().get_ident() else { continue };
		match ident.to_string().as_str() {
			"list" => {
				if field_attrs.list.is_some() {
					panic!("cannot use list attribute more than once");
				}
				field_attrs.list = Some(attr.parse_args().expect("list attribute takes a length type"));
			},
			"zeroed" => field_attrs.zeroed = true,
			_ => {},
		}
	}
	if field_attrs.zeroed && field_attrs.list.is_some() {
		panic!("zeroed field cannot be combined with list");
	}
	field_attrs
}

fn read_derive_impl(input: &DeriveInput) -> TokenStream {
	let (fields, tuple) = match &input.data {
		Data::Struct(DataStruct { fields: Fields::Named(FieldsNamed { named, .. }), .. }) => (named, false),
		Data::Struct(DataStruct { fields: Fields::Unnamed(FieldsUnnamed { unnamed, .. }), .. }) => (unnamed, true),
		_ => unimplemented!("only tuple struct or struct with named fields supported"),
	};
	let mut body = quote! {};
	let mut initializer = quote! {};
	let mut tuple_field_num = 0u8..;
	for field in fields {
		let FieldAttrs { list, zeroed } = parse_field_attrs(&field.attrs);
		let field_expr = match (zeroed, list) {
			(true, _) => quote! { ::core::default::Default::default() },//not in file
			(false, Some(len_type)) => quote! { tr_level::read_list::<_, _, #len_type>(reader)? },//read a count, read that many items
			(false, None) => quote! { tr_level::Readable::read(reader)? },
		};
		let field_ident = match &field.ident {
			Some(field_ident) => Cow::Borrowed(field_ident),
			None => Cow::Owned(Ident::new(&format!("field{}", tuple_field_num.next().unwrap()), Span::call_site())),
		};
		body = quote! {
			#body
			let #field_ident = #field_expr;
		};
		initializer = quote! { #initializer #field_ident, };
	}
	initializer = if tuple { quote! { (#initializer) } } else { quote! { {#initializer} } };
	let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
	let type_name = &input.ident;
	quote! {
		impl #impl_generics tr_level::Readable for #type_name #ty_generics #where_clause {
			fn read<R: std::io::Read + std::io::Seek>(reader: &mut R) -> std::io::Result<Self> {
				#body
				Ok(#type_name #initializer)
			}
		}
	}
}

#[proc_macro_derive(Readable, attributes(list, zeroed))]
pub fn read_derive(tokens: proc_macro::TokenStream) -> proc_macro::TokenStream {
	read_derive_impl(&syn::parse_macro_input!(tokens)).into()
}
