use std::io::{Read, Result, Seek};
use bitfield::bitfield;
use crate::{read_bytes, Readable};

pub const TILE_SIDE_LEN: usize = 256;
pub const TILE_PIXELS: usize = TILE_SIDE_LEN * TILE_SIDE_LEN;
pub const PALETTE_LEN: usize = 256;

/// 256x256 palette-indexed texture page.
#[derive(Clone, Debug)]
pub struct Tile {
	/// Indices into `Level.palette`, row major.
	pub pixels: Box<[u8; TILE_PIXELS]>,
}

impl Readable for Tile {
	fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
		let pixels = read_bytes(reader, TILE_PIXELS)?;
		Ok(Tile { pixels: pixels.try_into().ok().unwrap() })//read exactly TILE_PIXELS
	}
}

#[repr(C)]
#[derive(Readable, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Rgb {
	/// Expands a 6-bit-per-channel colour to 8 bits.
	pub fn from_6_bit(self) -> Self {
		Rgb { r: self.r << 2, g: self.g << 2, b: self.b << 2 }
	}
}

pub mod blend_mode {
	pub const OPAQUE: u16 = 0;
	pub const TEST: u16 = 1;
	pub const ADD: u16 = 2;
}

bitfield! {
	#[derive(Readable, Clone, Copy)]
	pub struct TileRef(u16);
	impl Debug;
	/// Index into `Level.tiles`.
	pub u16, tile_index, _: 13, 0;
	pub triangle, _: 15;
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct TexCoord {
	/// 1 if `x_pixel` is the low side of the texture, 255 if the high side.
	pub x_coord: u8,
	pub x_pixel: u8,
	pub y_coord: u8,
	pub y_pixel: u8,
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct ObjectTexture {
	/// One of the constants in `blend_mode`.
	pub blend_mode: u16,
	pub tile: TileRef,
	pub corners: [TexCoord; 4],
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct SpriteTexture {
	/// Index into `Level.tiles`.
	pub tile_index: u16,
	pub u: u8,
	pub v: u8,
	/// Pixels * 256 + 255.
	pub width: u16,
	/// Pixels * 256 + 255.
	pub height: u16,
	pub left: i16,
	pub top: i16,
	pub right: i16,
	pub bottom: i16,
}

/// Run of sprite textures for one entity type. `len` is stored negated in the file and flipped on
/// decode.
#[derive(Readable, Clone, Copy, Debug)]
pub struct SpriteSequence {
	/// Matched to `Entity.type_id`.
	pub id: i32,
	pub len: i16,
	/// Index into `Level.sprite_textures`.
	pub start: i16,
}

/// Iterates the groups of the animated texture table. The first word is the number of groups,
/// each group is its length minus one followed by that many plus one `Level.object_textures`
/// indices. Stops early if the table is truncated.
pub fn animated_texture_groups(words: &[u16]) -> impl Iterator<Item = &[u16]> {
	let (num_groups, mut rest) = match words.split_first() {
		Some((&num, rest)) => (num as usize, rest),
		None => (0, words),
	};
	(0..num_groups).map_while(move |_| {
		let (&len, tail) = rest.split_first()?;
		let len = len as usize + 1;
		if tail.len() < len {
			return None;
		}
		let (group, tail) = tail.split_at(len);
		rest = tail;
		Some(group)
	})
}
