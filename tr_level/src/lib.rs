/*!
Decoder and world queries for TR1 level files.

[`Level::from_bytes`] runs the decode plan over an in-memory level file. The decoded level answers
sector and floor queries ([`Level::sector`], [`Level::floor_info`]) and manages the entity slot array
([`Level::entity_add`], [`Level::entity_remove`]).
*/

extern crate self as tr_level;

pub mod decode;
pub mod error;
pub mod floor;
pub mod model;
pub(crate) mod impls;
mod locate;
mod reader;
mod slots;

use std::io::{Read, Result, Seek, SeekFrom};
use num_traits::AsPrimitive;
pub(crate) use tr_derive::Readable;

pub use decode::{Dialect, LoadOptions, Step};
pub use error::LevelError;
pub use floor::{FloorFault, FloorInfo, Trigger, TriggerAction};
pub use locate::SectorOffset;
pub use model::Level;
pub use reader::ByteReader;
pub use slots::RESERVED_ENTITIES;

/// Cap on up-front allocation for counted lists, so a corrupt count fails on read rather than on alloc.
const PREALLOC_LIMIT: usize = 1 << 16;

/// A record with a fixed on-disk layout.
pub trait Readable: Sized {
	fn read<R: Read + Seek>(reader: &mut R) -> Result<Self>;
}

pub(crate) fn read_boxed_slice<R: Read + Seek, T: Readable>(reader: &mut R, len: usize) -> Result<Box<[T]>> {
	let mut vec = Vec::with_capacity(len.min(PREALLOC_LIMIT));
	for _ in 0..len {
		vec.push(T::read(reader)?);
	}
	Ok(vec.into_boxed_slice())
}

pub(crate) fn read_list<R: Read + Seek, T: Readable, L: Readable + AsPrimitive<usize>>(reader: &mut R) -> Result<Box<[T]>> {
	let len = L::read(reader)?.as_();
	read_boxed_slice(reader, len)
}

/// Bulk read of a byte blob.
pub(crate) fn read_bytes<R: Read>(reader: &mut R, len: usize) -> Result<Box<[u8]>> {
	let mut bytes = Vec::with_capacity(len.min(PREALLOC_LIMIT));
	reader.take(len as u64).read_to_end(&mut bytes)?;
	if bytes.len() != len {
		return Err(std::io::ErrorKind::UnexpectedEof.into());
	}
	Ok(bytes.into_boxed_slice())
}

pub(crate) fn read_byte_list<R: Read + Seek, L: Readable + AsPrimitive<usize>>(reader: &mut R) -> Result<Box<[u8]>> {
	let len = L::read(reader)?.as_();
	read_bytes(reader, len)
}

pub(crate) fn skip<R: Seek>(reader: &mut R, num: i64) -> Result<()> {
	reader.seek(SeekFrom::Current(num))?;
	Ok(())
}
