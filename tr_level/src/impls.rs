use std::io::{Read, Result, Seek};
use arrayvec::ArrayVec;
use byteorder::{ReadBytesExt, LE};
use glam::{I16Vec3, IVec3};
use nonmax::{NonMaxU8, NonMaxU16};
use shared::MinMax;
use crate::Readable;

//primitive impls

macro_rules! impl_readable_prim {
	($type:ty, $func:ident $(, $($endian:tt)*)?) => {
		impl Readable for $type {
			fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
				reader.$func$($($endian)*)?()
			}
		}
	};
}

macro_rules! impl_readable_prim_le {
	($type:ty, $func:ident) => {
		impl_readable_prim!($type, $func, ::<LE>);
	};
}

impl_readable_prim!(u8, read_u8);
impl_readable_prim!(i8, read_i8);
impl_readable_prim_le!(u16, read_u16);
impl_readable_prim_le!(i16, read_i16);
impl_readable_prim_le!(u32, read_u32);
impl_readable_prim_le!(i32, read_i32);

//array impl

impl<T: Readable, const N: usize> Readable for [T; N] {
	fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
		let mut array = ArrayVec::<T, N>::new();
		for _ in 0..N {
			array.push(T::read(reader)?);
		}
		Ok(array.into_inner().ok().unwrap())//reads exactly N items
	}
}

//sentinel impls, max value means none

impl Readable for Option<NonMaxU8> {
	fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
		Ok(NonMaxU8::new(reader.read_u8()?))
	}
}

impl Readable for Option<NonMaxU16> {
	fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
		Ok(NonMaxU16::new(reader.read_u16::<LE>()?))
	}
}

//minmax impl

impl<T: Readable> Readable for MinMax<T> {
	fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
		Ok(MinMax { min: T::read(reader)?, max: T::read(reader)? })
	}
}

//glam impls

macro_rules! impl_readable_glam {
	($type:ty, $array:ty) => {
		impl Readable for $type {
			fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
				Ok(<$array>::read(reader)?.into())
			}
		}
	};
}

impl_readable_glam!(I16Vec3, [i16; 3]);
impl_readable_glam!(IVec3, [i32; 3]);

#[cfg(test)]
mod tests {
	use std::io::Cursor;
	use super::*;

	#[test]
	fn sentinel_reads_as_none() {
		let mut reader = Cursor::new([0xFF, 0x07, 0xFF, 0xFF, 0x02, 0x00]);
		assert_eq!(Option::<NonMaxU8>::read(&mut reader).unwrap(), None);
		assert_eq!(Option::<NonMaxU8>::read(&mut reader).unwrap().map(|value| value.get()), Some(7));
		assert_eq!(Option::<NonMaxU16>::read(&mut reader).unwrap(), None);
		assert_eq!(Option::<NonMaxU16>::read(&mut reader).unwrap().map(|value| value.get()), Some(2));
	}

	#[test]
	fn vectors_are_little_endian() {
		let mut reader = Cursor::new([0x01, 0x00, 0xFF, 0xFF, 0x00, 0x01]);
		assert_eq!(I16Vec3::read(&mut reader).unwrap(), I16Vec3::new(1, -1, 256));
	}
}
