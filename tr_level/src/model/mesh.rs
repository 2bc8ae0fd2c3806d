use std::io::{Read, Result, Seek};
use bitfield::bitfield;
use byteorder::{ReadBytesExt, LE};
use glam::I16Vec3;
use shared::MinMax;
use crate::{read_boxed_slice, Readable};
use super::{anim::BoundBox, room::{Rectangle, Triangle}};

bitfield! {
	#[derive(Readable, Clone, Copy)]
	pub struct Collider(u32);
	impl Debug;
	pub u16, radius, _: 9, 0;
	pub u8, info, _: 15, 10;
	pub u16, flags, _: 31, 16;
}

#[derive(Clone, Debug)]
pub enum MeshLighting {
	Normals(Box<[I16Vec3]>),
	Lights(Box<[i16]>),
}

impl Readable for MeshLighting {
	fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
		Ok(match reader.read_i16::<LE>()? {
			num if num > 0 => Self::Normals(read_boxed_slice(reader, num as usize)?),
			num => Self::Lights(read_boxed_slice(reader, num.unsigned_abs() as usize)?),
		})
	}
}

/// Mesh record, found at a byte offset into `Level.mesh_data`.
#[derive(Readable, Clone, Debug)]
pub struct Mesh {
	pub center: I16Vec3,
	pub collider: Collider,
	/// Relative to the owner's position.
	#[list(u16)]
	pub vertices: Box<[I16Vec3]>,
	pub lighting: MeshLighting,
	/// `texture` is an index into `Level.object_textures`.
	#[list(u16)]
	pub textured_rectangles: Box<[Rectangle]>,
	#[list(u16)]
	pub textured_triangles: Box<[Triangle]>,
	/// `texture` is an index into `Level.palette`.
	#[list(u16)]
	pub coloured_rectangles: Box<[Rectangle]>,
	#[list(u16)]
	pub coloured_triangles: Box<[Triangle]>,
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct StaticMesh {
	/// Matched to `RoomStaticMesh.static_mesh_id`.
	pub id: u32,
	/// Index into `Level.mesh_offsets`.
	pub mesh_index: u16,
	pub visibility: BoundBox,
	pub collision: BoundBox,
	pub flags: u16,
}

impl StaticMesh {
	/// Visibility or collision box turned by `angle`, a yaw in 1/65536 of a rotation snapped down
	/// to a quarter turn.
	pub fn bounds(&self, collision: bool, angle: u16) -> BoundBox {
		let bound_box = if collision { self.collision } else { self.visibility };
		let neg = |range: MinMax<i16>| MinMax { min: range.max.saturating_neg(), max: range.min.saturating_neg() };
		let (x, z) = match angle / 0x4000 {
			0 => (bound_box.x, bound_box.z),
			1 => (bound_box.z, neg(bound_box.x)),
			2 => (neg(bound_box.x), neg(bound_box.z)),
			_ => (neg(bound_box.z), bound_box.x),
		};
		BoundBox { x, y: bound_box.y, z }
	}
}
