use std::f32::consts::TAU;
use bitfield::bitfield;
use glam::{I16Vec3, IVec3, U16Vec3, Vec3};
use shared::MinMax;
use crate::Readable;

/// Angle steps per rotation in packed frame angles.
pub const FRAME_ANGLE_STEPS: u16 = 1024;
/// Words ahead of the rotations in a frame: bound box, offset, rotation count.
const FRAME_HEADER_WORDS: usize = 10;

/// 16.16 fixed-point.
#[derive(Readable, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fixed(pub i32);

impl Fixed {
	pub fn to_f32(self) -> f32 {
		self.0 as f32 / 65536.0
	}
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct Animation {
	/// Byte offset into `Level.frame_data`.
	pub frame_byte_offset: u32,
	/// Engine ticks per frame.
	pub frame_rate: u8,
	/// Words of `Level.frame_data` per frame.
	pub frame_size: u8,
	pub state: u16,
	pub speed: Fixed,
	pub accel: Fixed,
	pub frame_start: u16,
	pub frame_end: u16,
	/// Index into `Level.animations`.
	pub next_anim: u16,
	pub next_frame: u16,
	pub num_state_changes: u16,
	/// Index into `Level.anim_states`.
	pub state_change_index: u16,
	pub num_anim_commands: u16,
	/// Index into `Level.anim_commands`.
	pub anim_command_index: u16,
}

/// One entry of an animation's command list in `Level.anim_commands`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimCommand {
	Nop,
	/// Root displacement applied when the animation ends.
	Move(I16Vec3),
	/// Jump velocities applied when the animation ends.
	Speed { vertical: i16, horizontal: i16 },
	EmptyHands,
	Kill,
	Sound { frame: i16, sound_id: u16 },
	/// `effect` is one of the `SPECIAL_*` codes or a level-specific one.
	Special { frame: i16, effect: u16 },
}

impl AnimCommand {
	pub const SPECIAL_FLIP: u16 = 0;
	pub const SPECIAL_BUBBLE: u16 = 3;
	pub const SPECIAL_CTRL: u16 = 12;

	/// Decodes `count` commands from the front of `words`. `None` on an unknown code or when the
	/// arguments run past the end.
	pub fn decode_list(words: &[i16], count: usize) -> Option<Vec<Self>> {
		let mut words = words.iter().copied();
		let mut commands = Vec::with_capacity(count.min(words.len()));
		for _ in 0..count {
			let command = match words.next()? {
				0 => Self::Nop,
				1 => Self::Move(I16Vec3::new(words.next()?, words.next()?, words.next()?)),
				2 => Self::Speed { vertical: words.next()?, horizontal: words.next()? },
				3 => Self::EmptyHands,
				4 => Self::Kill,
				5 => Self::Sound { frame: words.next()?, sound_id: words.next()? as u16 },
				6 => Self::Special { frame: words.next()?, effect: words.next()? as u16 },
				_ => return None,
			};
			commands.push(command);
		}
		Some(commands)
	}
}

/// State change: when `state` is requested, the ranges decide where to go.
#[derive(Readable, Clone, Copy, Debug)]
pub struct AnimState {
	pub state: u16,
	pub num_ranges: u16,
	/// Index into `Level.anim_ranges`.
	pub range_index: u16,
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct AnimRange {
	/// Lowest frame this range covers.
	pub low: i16,
	/// Highest frame this range covers.
	pub high: i16,
	/// Index into `Level.animations`.
	pub next_anim: i16,
	pub next_frame: i16,
}

impl AnimRange {
	pub fn covers(&self, frame: i16) -> bool {
		self.low <= frame && frame <= self.high
	}
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct Model {
	/// Matched to `Entity.type_id`.
	pub id: u32,
	pub num_meshes: u16,
	/// Index into `Level.mesh_offsets` of the first mesh.
	pub mesh_index: u16,
	/// Word offset into `Level.mesh_node_data`.
	pub mesh_node_offset: u32,
	/// Byte offset into `Level.frame_data`.
	pub frame_byte_offset: u32,
	/// Index into `Level.animations`.
	pub anim_index: u16,
}

bitfield! {
	#[derive(Clone, Copy)]
	pub struct MeshNodeFlags(u32);
	impl Debug;
	pub pop, _: 0;
	pub push, _: 1;
}

/// Joint between a mesh and its parent. Stored as four words in `Level.mesh_node_data`.
#[derive(Clone, Copy, Debug)]
pub struct MeshNode {
	pub flags: MeshNodeFlags,
	/// Relative to parent.
	pub offset: IVec3,
}

impl MeshNode {
	pub const WORDS: usize = 4;

	pub(crate) fn from_words(words: &[u32]) -> Self {
		Self {
			flags: MeshNodeFlags(words[0]),
			offset: IVec3::new(words[1] as i32, words[2] as i32, words[3] as i32),
		}
	}
}

/// Joint angles packed into two words as three 10-bit fields.
///
/// `first` holds the low 6 bits of y in its top bits and z in its low 10, `second` holds x in bits
/// 4 to 13 and the high 4 bits of y in its low bits.
pub fn unpack_angles(first: u16, second: u16) -> U16Vec3 {
	U16Vec3 {
		x: (second & 0x3FF0) >> 4,
		y: ((second & 0x000F) << 6) | ((first & 0xFC00) >> 10),
		z: first & 0x03FF,
	}
}

pub fn angles_to_radians(angles: U16Vec3) -> Vec3 {
	angles.as_vec3() * (TAU / FRAME_ANGLE_STEPS as f32)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundBox {
	pub x: MinMax<i16>,
	pub y: MinMax<i16>,
	pub z: MinMax<i16>,
}

impl Readable for BoundBox {
	fn read<R: std::io::Read + std::io::Seek>(reader: &mut R) -> std::io::Result<Self> {
		Ok(BoundBox { x: MinMax::read(reader)?, y: MinMax::read(reader)?, z: MinMax::read(reader)? })
	}
}

/// One keyframe of a model.
#[derive(Clone, Debug)]
pub struct AnimFrame {
	pub bound_box: BoundBox,
	/// Root offset.
	pub offset: I16Vec3,
	/// Per joint, in `FRAME_ANGLE_STEPS` units.
	pub rotations: Box<[U16Vec3]>,
}

impl AnimFrame {
	/// Decodes the frame at `word_offset`; `None` if the frame runs past the end of `frame_data`.
	pub(crate) fn decode(frame_data: &[u16], word_offset: usize) -> Option<Self> {
		let header = frame_data.get(word_offset..word_offset.checked_add(FRAME_HEADER_WORDS)?)?;
		let word = |index: usize| header[index] as i16;
		let bound_box = BoundBox {
			x: MinMax { min: word(0), max: word(1) },
			y: MinMax { min: word(2), max: word(3) },
			z: MinMax { min: word(4), max: word(5) },
		};
		let offset = I16Vec3::new(word(6), word(7), word(8));
		let num_rotations = header[9] as usize;
		let start = word_offset + FRAME_HEADER_WORDS;
		let packed = frame_data.get(start..start + num_rotations * 2)?;
		let rotations = packed
			.chunks_exact(2)
			.map(|pair| unpack_angles(pair[0], pair[1]))
			.collect();
		Some(AnimFrame { bound_box, offset, rotations })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn angles_unpack_from_split_fields() {
		//x = 0x155, y = 0x2AB (high 4 bits 0xA, low 6 bits 0x2B), z = 0x0F0
		let second = (0x155 << 4) | 0xA;
		let first = (0x2B << 10) | 0x0F0;
		assert_eq!(unpack_angles(first, second), U16Vec3::new(0x155, 0x2AB, 0x0F0));
	}

	#[test]
	fn angles_ignore_unused_bits() {
		assert_eq!(unpack_angles(0, 0xC000), U16Vec3::ZERO);
		assert_eq!(unpack_angles(0xFFFF, 0xFFFF), U16Vec3::splat(1023));
	}

	#[test]
	fn quarter_turn_in_radians() {
		let radians = angles_to_radians(U16Vec3::new(256, 0, 512));
		assert!((radians.x - TAU / 4.0).abs() < 1e-6);
		assert!((radians.z - TAU / 2.0).abs() < 1e-6);
	}

	#[test]
	fn frame_decodes_header_and_rotations() {
		let mut data = vec![0u16; 3];
		data.extend([-10i16 as u16, 10, -20i16 as u16, 20, -30i16 as u16, 30, 1, 2, 3, 2]);
		data.extend([0x03FF, 0x0000, 0x0000, 0x3FF0]);
		let frame = AnimFrame::decode(&data, 3).unwrap();
		assert_eq!(frame.bound_box.y, MinMax { min: -20, max: 20 });
		assert_eq!(frame.offset, I16Vec3::new(1, 2, 3));
		assert_eq!(&*frame.rotations, &[U16Vec3::new(0, 0, 1023), U16Vec3::new(1023, 0, 0)]);
	}

	#[test]
	fn anim_commands_take_their_arguments() {
		let words = [1, 10, -20, 30, 2, -5, 7, 3, 5, 12, 60, 6, 40, AnimCommand::SPECIAL_FLIP as i16, 4, 99];
		let commands = AnimCommand::decode_list(&words, 6).unwrap();
		assert_eq!(commands, [
			AnimCommand::Move(I16Vec3::new(10, -20, 30)),
			AnimCommand::Speed { vertical: -5, horizontal: 7 },
			AnimCommand::EmptyHands,
			AnimCommand::Sound { frame: 12, sound_id: 60 },
			AnimCommand::Special { frame: 40, effect: AnimCommand::SPECIAL_FLIP },
			AnimCommand::Kill,
		]);
	}

	#[test]
	fn bad_anim_commands_are_none() {
		assert!(AnimCommand::decode_list(&[7], 1).is_none());
		assert!(AnimCommand::decode_list(&[1, 10, 20], 1).is_none());
		assert!(AnimCommand::decode_list(&[4], 2).is_none());
		assert_eq!(AnimCommand::decode_list(&[0, 4], 1), Some(vec![AnimCommand::Nop]));
	}

	#[test]
	fn truncated_frame_is_none() {
		let data = [0u16, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0];
		assert!(AnimFrame::decode(&data, 0).is_none());
		assert!(AnimFrame::decode(&data, 5).is_none());
	}
}
