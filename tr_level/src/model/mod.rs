pub mod anim;
pub mod boxes;
pub mod entity;
pub mod mesh;
pub mod room;
pub mod sound;
pub mod texture;

use std::io::Result;
use glam::{I16Vec3, IVec3};
use crate::{decode::Dialect, ByteReader, Readable};

pub use anim::{AnimCommand, AnimFrame, AnimRange, AnimState, Animation, BoundBox, Fixed, MeshNode, Model};
pub use boxes::{BoxData, Overlap, TrBox, Zone, ZoneIds};
pub use entity::{Controller, Entity, EntityFlags, EntitySlot, Representation};
pub use mesh::{Mesh, MeshLighting, StaticMesh};
pub use room::{Portal, Room, RoomGeom, RoomInfo, Sector, Sectors};
pub use sound::{SoundInfo, SoundSource};
pub use texture::{ObjectTexture, Rgb, SpriteSequence, SpriteTexture, Tile};

pub const LIGHT_MAP_LEN: usize = 32;

#[derive(Readable, Clone, Copy, Debug)]
pub struct Camera {
	/// World coords.
	pub pos: IVec3,
	/// Index into `Level.rooms`.
	pub room_index: i16,
	pub flags: u16,
}

/// Cinematic camera keyframe.
#[derive(Readable, Clone, Copy, Debug)]
pub struct CameraFrame {
	pub rot_y: i16,
	pub rot_z: i16,
	pub unused: i16,
	pub pos_z: i16,
	pub pos_y: i16,
	pub pos_x: i16,
	pub unknown: i16,
	pub rot_x: i16,
}

impl CameraFrame {
	pub fn pos(&self) -> I16Vec3 {
		I16Vec3::new(self.pos_x, self.pos_y, self.pos_z)
	}
}

/// A decoded level. Everything but `entities` is fixed once decoding finishes.
#[derive(Clone, Debug, Default)]
pub struct Level {
	pub version: u32,
	pub dialect: Dialect,
	pub tiles: Box<[Tile]>,
	pub rooms: Box<[Room]>,
	pub floor_data: Box<[u16]>,
	pub mesh_data: Box<[u8]>,
	/// Byte offsets into `mesh_data`.
	pub mesh_offsets: Box<[u32]>,
	pub animations: Box<[Animation]>,
	pub anim_states: Box<[AnimState]>,
	pub anim_ranges: Box<[AnimRange]>,
	pub anim_commands: Box<[i16]>,
	pub mesh_node_data: Box<[u32]>,
	pub frame_data: Box<[u16]>,
	pub models: Box<[Model]>,
	pub static_meshes: Box<[StaticMesh]>,
	pub object_textures: Box<[ObjectTexture]>,
	pub sprite_textures: Box<[SpriteTexture]>,
	pub sprite_sequences: Box<[SpriteSequence]>,
	pub cameras: Box<[Camera]>,
	pub sound_sources: Box<[SoundSource]>,
	pub box_data: BoxData,
	pub animated_textures: Box<[u16]>,
	/// File-declared entities, then the reserved pool.
	pub(crate) entities: Box<[EntitySlot]>,
	/// Number of file-declared entities, the index of the first reserved slot.
	pub(crate) base_entity_count: usize,
	/// 8 bits per channel after decoding.
	pub palette: Box<[Rgb]>,
	pub cinematic_frames: Box<[CameraFrame]>,
	pub demo_data: Box<[u8]>,
	/// Index into `sound_infos` per sound id, -1 if unused.
	pub sound_map: Box<[i16]>,
	pub sound_infos: Box<[SoundInfo]>,
	pub sample_data: Box<[u8]>,
	/// Byte offsets into `sample_data`.
	pub sample_offsets: Box<[u32]>,
}

impl Level {
	/// Decodes the mesh at `mesh_offsets[mesh_index]`.
	pub fn mesh(&self, mesh_index: usize) -> Result<Mesh> {
		let offset = self.mesh_offsets.get(mesh_index).copied().ok_or(std::io::ErrorKind::NotFound)?;
		let mut reader = ByteReader::new(&self.mesh_data);
		reader.set_pos(offset as usize)?;
		Mesh::read(&mut reader)
	}

	pub fn static_mesh(&self, id: u16) -> Option<&StaticMesh> {
		self.static_meshes.iter().find(|static_mesh| static_mesh.id == id as u32)
	}

	/// Joints of `model`, one fewer than its meshes.
	pub fn mesh_nodes(&self, model: &Model) -> Option<Vec<MeshNode>> {
		let num_nodes = (model.num_meshes as usize).saturating_sub(1);
		let start = model.mesh_node_offset as usize;
		let words = self.mesh_node_data.get(start..start + num_nodes * MeshNode::WORDS)?;
		Some(words.chunks_exact(MeshNode::WORDS).map(MeshNode::from_words).collect())
	}

	/// First frame of `model`.
	pub fn frame(&self, model: &Model) -> Option<AnimFrame> {
		AnimFrame::decode(&self.frame_data, model.frame_byte_offset as usize / 2)
	}

	/// Frame `frame` of animation `anim_index`, counted from the animation's first frame data.
	pub fn anim_frame(&self, anim_index: usize, frame: usize) -> Option<AnimFrame> {
		let anim = self.animations.get(anim_index)?;
		let word_offset = frame
			.checked_mul(anim.frame_size as usize)?
			.checked_add(anim.frame_byte_offset as usize / 2)?;
		AnimFrame::decode(&self.frame_data, word_offset)
	}

	/// Decoded command list of `anim`. `None` if the list is malformed.
	pub fn anim_command_list(&self, anim: &Animation) -> Option<Vec<AnimCommand>> {
		let words = self.anim_commands.get(anim.anim_command_index as usize..)?;
		AnimCommand::decode_list(words, anim.num_anim_commands as usize)
	}

	pub fn state_changes(&self, anim: &Animation) -> &[AnimState] {
		let start = anim.state_change_index as usize;
		self.anim_states.get(start..start + anim.num_state_changes as usize).unwrap_or_default()
	}

	pub fn anim_ranges(&self, state: &AnimState) -> &[AnimRange] {
		let start = state.range_index as usize;
		self.anim_ranges.get(start..start + state.num_ranges as usize).unwrap_or_default()
	}

	/// Animation and frame to switch to when `state` is requested while `anim_index` is at `frame`.
	pub fn find_transition(&self, anim_index: usize, state: u16, frame: i16) -> Option<(u16, u16)> {
		let anim = self.animations.get(anim_index)?;
		self.state_changes(anim)
			.iter()
			.filter(|change| change.state == state)
			.flat_map(|change| self.anim_ranges(change))
			.find(|range| range.covers(frame))
			.map(|range| (range.next_anim as u16, range.next_frame as u16))
	}

	pub fn sound_info(&self, sound_id: usize) -> Option<&SoundInfo> {
		let index = usize::try_from(*self.sound_map.get(sound_id)?).ok()?;
		self.sound_infos.get(index)
	}

	/// Model or sprite sequence for an entity type id. Models take precedence.
	pub fn resolve_representation(&self, type_id: u16) -> Option<Representation> {
		if let Some(index) = self.models.iter().position(|model| model.id == type_id as u32) {
			return Some(Representation::Model(index));
		}
		self.sprite_sequences
			.iter()
			.position(|sequence| sequence.id == type_id as i32)
			.map(Representation::SpriteSequence)
	}
}
