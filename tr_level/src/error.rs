use std::io;
use thiserror::Error;
use crate::decode::Step;

#[derive(Error, Debug)]
pub enum LevelError {
	/// The buffer ended early or a section is malformed. No level is produced.
	#[error("corrupt level data in {step} at byte {offset}: {source}")]
	CorruptFormat {
		step: Step,
		offset: usize,
		#[source]
		source: io::Error,
	},
	#[error("unsupported level version {0:#x}")]
	UnsupportedVersion(u32),
	/// A trigger lists more sub-commands than fit in a `Trigger`.
	#[error("trigger at floor data index {floor_index} has more than {max} sub-commands")]
	TriggerOverflow {
		floor_index: usize,
		max: usize,
	},
	#[error("no free entity slot in reserved pool of {capacity}")]
	SlotExhausted {
		capacity: usize,
	},
}

pub type Result<T> = std::result::Result<T, LevelError>;
