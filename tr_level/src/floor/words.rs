use bitfield::bitfield;

bitfield! {
	/// Header of one floor data command.
	#[derive(Clone, Copy, PartialEq, Eq)]
	pub struct FloorCommand(u16);
	impl Debug;
	pub u8, func, _: 7, 0;
	pub u8, sub, _: 14, 8;
	/// Last command of the sector.
	pub end, _: 15;
}

bitfield! {
	/// Word following a trigger header.
	#[derive(Clone, Copy, PartialEq, Eq)]
	pub struct TriggerInfo(u16);
	impl Debug;
	pub u8, timer, _: 7, 0;
	pub once, _: 8;
	/// XORed into the activation mask of activated entities.
	pub u8, mask, _: 13, 9;
}

bitfield! {
	/// One action of a trigger.
	#[derive(Clone, Copy, PartialEq, Eq)]
	pub struct TriggerCommand(u16);
	impl Debug;
	pub u16, args, _: 9, 0;
	pub u8, action_bits, _: 14, 10;
	/// Last action of the trigger.
	pub end, _: 15;
}

bitfield! {
	/// Word following a `CameraSwitch` action.
	#[derive(Clone, Copy, PartialEq, Eq)]
	pub struct CameraParams(u16);
	impl Debug;
	pub u8, delay, _: 7, 0;
	pub once, _: 8;
	pub end, _: 15;
}

impl FloorCommand {
	pub fn new(word: u16) -> Self {
		Self(word)
	}

	pub fn function(&self) -> Option<FloorFunc> {
		FloorFunc::from_code(self.func())
	}
}

impl TriggerInfo {
	pub fn new(word: u16) -> Self {
		Self(word)
	}
}

impl TriggerCommand {
	pub fn new(word: u16) -> Self {
		Self(word)
	}

	/// `None` for codes outside the known set.
	pub fn action(&self) -> Option<Action> {
		Action::from_code(self.action_bits())
	}
}

impl CameraParams {
	pub fn new(word: u16) -> Self {
		Self(word)
	}
}

/// Slant of a floor or ceiling, in quarter height units per sector-local unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Slant {
	pub x: i8,
	pub z: i8,
}

impl Slant {
	pub fn from_word(word: u16) -> Self {
		let [x, z] = word.to_le_bytes();
		Slant { x: x as i8, z: z as i8 }
	}
}

macro_rules! code_enum {
	(
		$(#[$attr:meta])*
		pub enum $name:ident {
			$($(#[$variant_attr:meta])* $variant:ident = $code:literal,)*
		}
	) => {
		$(#[$attr])*
		#[derive(Clone, Copy, Debug, PartialEq, Eq)]
		pub enum $name {
			$($(#[$variant_attr])* $variant = $code,)*
		}

		impl $name {
			pub fn from_code(code: u8) -> Option<Self> {
				match code {
					$($code => Some(Self::$variant),)*
					_ => None,
				}
			}
		}
	};
}

code_enum! {
	/// `FloorCommand.func` values.
	pub enum FloorFunc {
		Portal = 1,
		Floor = 2,
		Ceiling = 3,
		Trigger = 4,
		Kill = 5,
	}
}

code_enum! {
	/// What sets a trigger off, `FloorCommand.sub` of a trigger header.
	pub enum TriggerKind {
		Activate = 0,
		Pad = 1,
		Switch = 2,
		Key = 3,
		Pickup = 4,
		Heavy = 5,
		AntiPad = 6,
		Combat = 7,
		Dummy = 8,
		Anti = 9,
	}
}

code_enum! {
	/// `TriggerCommand.action_bits` values.
	pub enum Action {
		/// Activate entity `args`.
		Activate = 0,
		/// Switch to camera `args`. Followed by a `CameraParams` word.
		CameraSwitch = 1,
		/// Underwater current toward sink `args`.
		Flow = 2,
		FlipMap = 3,
		FlipOn = 4,
		FlipOff = 5,
		/// Point the camera at entity `args`.
		CameraTarget = 6,
		EndLevel = 7,
		Soundtrack = 8,
		Hardcode = 9,
		Secret = 10,
		ClearBodies = 11,
		CameraFlyby = 12,
		Cutscene = 13,
	}
}
