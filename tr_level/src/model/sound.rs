use bitfield::bitfield;
use glam::IVec3;
use crate::Readable;

pub const SOUND_MAP_LEN: usize = 256;

#[derive(Readable, Clone, Copy, Debug)]
pub struct SoundSource {
	/// World coords.
	pub pos: IVec3,
	/// Index into `Level.sound_map`.
	pub sound_id: u16,
	pub flags: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopMode {
	None,
	OneShotRewound,
	OneShotWait,
	Looped,
}

bitfield! {
	#[derive(Readable, Clone, Copy)]
	pub struct SoundFlags(u16);
	impl Debug;
	pub u8, loop_bits, _: 1, 0;
	pub u8, sample_count, _: 5, 2;
}

#[derive(Readable, Clone, Copy, Debug)]
pub struct SoundInfo {
	/// Index into `Level.sample_offsets`.
	pub sample_index: u16,
	pub volume: u16,
	/// If nonzero, the sound is skipped when a random 15-bit value exceeds it.
	pub chance: u16,
	pub flags: SoundFlags,
}

impl SoundInfo {
	pub fn loop_mode(&self) -> LoopMode {
		match self.flags.loop_bits() {
			0 => LoopMode::None,
			1 => LoopMode::OneShotRewound,
			2 => LoopMode::OneShotWait,
			_ => LoopMode::Looped,
		}
	}

	/// Number of alternative samples, picked at random, starting at `sample_index`.
	pub fn sample_count(&self) -> u8 {
		self.flags.sample_count()
	}
}
