use std::io::{Read, Result, Seek, SeekFrom};
use bitfield::bitfield;
use byteorder::{ReadBytesExt, LE};
use glam::{I16Vec3, IVec3, Vec3};
use nonmax::{NonMaxU16, NonMaxU8};
use shared::{MinMax, VecMinMaxFromIterator};
use crate::{read_boxed_slice, read_list, Readable};

/// World units per sector side.
pub const SECTOR_SIZE: i32 = 1024;
/// World units per step of `Sector.floor` and `Sector.ceiling`.
pub const HEIGHT_UNIT: i32 = 256;

#[derive(Readable, Clone, Copy, Debug, Default)]
pub struct RoomInfo {
	/// World coord.
	pub x: i32,
	/// World coord.
	pub z: i32,
	pub y_bottom: i32,
	pub y_top: i32,
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct RoomVertex {
	/// Relative to room.
	pub pos: I16Vec3,
	/// 0 (bright) to 0x1FFF (dark).
	pub lighting: i16,
}

bitfield! {
	#[derive(Readable, Clone, Copy)]
	pub struct TextureDetails(u16);
	impl Debug;
	/// Index into `Level.object_textures`.
	pub u16, texture_index, _: 14, 0;
	/// Index into `Level.palette`, for coloured mesh faces.
	pub u8, palette_index, _: 7, 0;
	pub double_sided, _: 15;
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct Face<const N: usize> {
	/// Index into the owner's vertices.
	pub vertex_indices: [u16; N],
	pub texture: TextureDetails,
}

pub type Rectangle = Face<4>;
pub type Triangle = Face<3>;

#[derive(Readable, Clone, Copy, Debug)]
pub struct RoomSprite {
	/// Index into `RoomGeom.vertices`.
	pub vertex_index: u16,
	/// Index into `Level.sprite_textures`.
	pub sprite_texture_index: u16,
}

#[derive(Clone, Debug, Default)]
pub struct RoomGeom {
	pub vertices: Box<[RoomVertex]>,
	pub rectangles: Box<[Rectangle]>,
	pub triangles: Box<[Triangle]>,
	pub sprites: Box<[RoomSprite]>,
}

impl Readable for RoomGeom {
	/// The block is sized by a word count ahead of the sub-lists. The cursor always lands at the end
	/// the word count gives, whatever the sub-lists add up to.
	fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
		let num_words = reader.read_u32::<LE>()?;
		let start = reader.stream_position()?;
		let geom = RoomGeom {
			vertices: read_list::<_, _, u16>(reader)?,
			rectangles: read_list::<_, _, u16>(reader)?,
			triangles: read_list::<_, _, u16>(reader)?,
			sprites: read_list::<_, _, u16>(reader)?,
		};
		reader.seek(SeekFrom::Start(start + num_words as u64 * 2))?;
		Ok(geom)
	}
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct Portal {
	/// Index into `Level.rooms`.
	pub adjoining_room_index: u16,
	pub normal: I16Vec3,
	/// Relative to room.
	pub vertices: [I16Vec3; 4],
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct Sector {
	/// Word index into `Level.floor_data`, 0 if the sector has none.
	pub floor_index: u16,
	/// Index into `BoxData.boxes`.
	pub box_index: Option<NonMaxU16>,
	/// Index into `Level.rooms`.
	pub room_below: Option<NonMaxU8>,
	/// Units of `HEIGHT_UNIT`.
	pub floor: i8,
	/// Index into `Level.rooms`.
	pub room_above: Option<NonMaxU8>,
	/// Units of `HEIGHT_UNIT`.
	pub ceiling: i8,
}

/// Sector grid, column major: sector (x, z) is at `x * z_count + z`.
#[derive(Clone, Debug, Default)]
pub struct Sectors {
	pub z_count: u16,
	pub x_count: u16,
	pub sectors: Box<[Sector]>,
}

impl Sectors {
	pub fn get(&self, x: usize, z: usize) -> Option<&Sector> {
		if x >= self.x_count as usize || z >= self.z_count as usize {
			return None;
		}
		self.sectors.get(x * self.z_count as usize + z)
	}
}

impl Readable for Sectors {
	fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
		let z_count = reader.read_u16::<LE>()?;
		let x_count = reader.read_u16::<LE>()?;
		let sectors = read_boxed_slice(reader, z_count as usize * x_count as usize)?;
		Ok(Sectors { z_count, x_count, sectors })
	}
}

/// Point light. The record is read field by field with no padding between `pos` and `intensity`.
#[derive(Readable, Clone, Copy, Debug)]
pub struct Light {
	/// World coords.
	pub pos: IVec3,
	pub intensity: u16,
	pub fade: u32,
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct RoomStaticMesh {
	/// World coords.
	pub pos: IVec3,
	/// Units are 1/65536 of a rotation.
	pub angle: u16,
	pub intensity: u16,
	/// Matched to `StaticMesh.id` in `Level.static_meshes`.
	pub static_mesh_id: u16,
	/// Runtime state, not stored in the file.
	#[zeroed]
	pub flags: u16,
}

bitfield! {
	#[derive(Readable, Clone, Copy, Default)]
	pub struct RoomFlags(u16);
	impl Debug;
	pub water, _: 0;
	pub visible, _: 15;
}

#[derive(Readable, Clone, Debug)]
pub struct Room {
	pub info: RoomInfo,
	pub geom: RoomGeom,
	#[list(u16)]
	pub portals: Box<[Portal]>,
	pub sectors: Sectors,
	/// 0 (bright) to 0x1FFF (dark).
	pub ambient: u16,
	#[list(u16)]
	pub lights: Box<[Light]>,
	#[list(u16)]
	pub static_meshes: Box<[RoomStaticMesh]>,
	/// Index into `Level.rooms` of the room swapped in by the flip map.
	pub alternate_room: Option<NonMaxU16>,
	pub flags: RoomFlags,
}

impl Room {
	pub fn alternate_room_index(&self) -> Option<usize> {
		self.alternate_room.map(|index| index.get() as usize)
	}

	/// World-space bounds of the room's vertices.
	pub fn vertex_bounds(&self) -> Option<MinMax<Vec3>> {
		let origin = Vec3::new(self.info.x as f32, 0.0, self.info.z as f32);
		self.geom.vertices.iter().map(|vertex| origin + vertex.pos.as_vec3()).min_max()
	}
}
