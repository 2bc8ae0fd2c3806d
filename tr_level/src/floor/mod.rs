/*!
Floor data interpreter.

Each sector with a nonzero `floor_index` owns a run of words in `Level.floor_data`: a sequence of
commands, each a `FloorCommand` header and its payload, the last with its end bit set. Walking the run
yields the sector's `FloorInfo` for one point.
*/

mod words;

use arrayvec::ArrayVec;
use glam::Vec3;
use log::warn;
use crate::{error::{LevelError, Result}, locate::SectorOffset, model::{room::{HEIGHT_UNIT, SECTOR_SIZE}, Level, Sector}};

pub use words::{Action, CameraParams, FloorCommand, FloorFunc, Slant, TriggerCommand, TriggerInfo, TriggerKind};

/// Cap on the action words of one trigger. A camera switch and its parameter word count as two.
pub const MAX_TRIGGER_ACTIONS: usize = 16;

/// Malformed floor data found by a walk. The walk stops, keeping what it has computed so far except
/// the trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloorFault {
	/// Header with a function code outside `FloorFunc`, at word `index`.
	UnknownCommand { func: u8, index: usize },
	/// Trigger header with a kind outside `TriggerKind`, at word `index`.
	UnknownTriggerKind { sub: u8, index: usize },
	/// The run continues past the end of the floor data.
	Overrun { index: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggerAction {
	pub command: TriggerCommand,
	/// Present for `Action::CameraSwitch`.
	pub camera: Option<CameraParams>,
}

impl TriggerAction {
	pub fn action(&self) -> Option<Action> {
		self.command.action()
	}

	pub fn args(&self) -> u16 {
		self.command.args()
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trigger {
	pub kind: TriggerKind,
	pub info: TriggerInfo,
	pub actions: ArrayVec<TriggerAction, MAX_TRIGGER_ACTIONS>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloorInfo {
	/// World y, slant applied.
	pub floor: i32,
	/// World y, slant applied.
	pub ceiling: i32,
	pub slant_x: i32,
	pub slant_z: i32,
	/// Room entered through a portal in this sector.
	pub room_next: Option<usize>,
	pub room_below: Option<usize>,
	pub room_above: Option<usize>,
	pub floor_index: u16,
	pub kill: bool,
	pub trigger: Option<Trigger>,
	pub fault: Option<FloorFault>,
}

impl FloorInfo {
	/// Raw sector heights, no floor data applied.
	pub fn flat(sector: &Sector) -> Self {
		FloorInfo {
			floor: HEIGHT_UNIT * sector.floor as i32,
			ceiling: HEIGHT_UNIT * sector.ceiling as i32,
			slant_x: 0,
			slant_z: 0,
			room_next: None,
			room_below: sector.room_below.map(|room| room.get() as usize),
			room_above: sector.room_above.map(|room| room.get() as usize),
			floor_index: sector.floor_index,
			kill: false,
			trigger: None,
			fault: None,
		}
	}

	/// Unit floor normal, y down.
	pub fn normal(&self) -> Vec3 {
		Vec3::new(-self.slant_x as f32, -4.0, -self.slant_z as f32).normalize()
	}

	/// Horizontal `dir` tilted to run along the floor. Zero if `dir` is zero.
	pub fn slant_dir(&self, dir: Vec3) -> Vec3 {
		//normal projected into the vertical plane through dir
		let side = Vec3::new(dir.z, 0.0, -dir.x);
		let normal = self.normal();
		let normal = normal - side * side.dot(normal);
		normal.cross(dir.cross(normal)).normalize_or_zero()
	}

	pub fn is_slanted(&self) -> bool {
		self.slant_x != 0 || self.slant_z != 0
	}
}

enum Stop {
	Fault(FloorFault),
	Fatal(LevelError),
}

impl From<FloorFault> for Stop {
	fn from(fault: FloorFault) -> Self {
		Stop::Fault(fault)
	}
}

/// Bounds-checked read position in the floor data.
struct FloorCursor<'a> {
	words: &'a [u16],
	index: usize,
}

impl<'a> FloorCursor<'a> {
	fn next(&mut self) -> std::result::Result<u16, FloorFault> {
		let word = *self.words.get(self.index).ok_or(FloorFault::Overrun { index: self.index })?;
		self.index += 1;
		Ok(word)
	}
}

/// Height correction of a slanted floor at sector-local `d` along one axis.
fn floor_slant_term(slant: i32, d: i32) -> i32 {
	(slant * if slant > 0 { d - SECTOR_SIZE } else { d }) >> 2
}

fn walk_commands(info: &mut FloorInfo, cursor: &mut FloorCursor, offset: SectorOffset) -> std::result::Result<(), Stop> {
	let (dx, dz) = (offset.dx, offset.dz);
	loop {
		let index = cursor.index;
		let cmd = FloorCommand::new(cursor.next()?);
		match cmd.function() {
			Some(FloorFunc::Portal) => info.room_next = Some(cursor.next()? as usize),
			Some(FloorFunc::Floor) => {
				let Slant { x, z } = Slant::from_word(cursor.next()?);
				let (sx, sz) = (x as i32, z as i32);
				info.slant_x = sx;
				info.slant_z = sz;
				info.floor -= floor_slant_term(sx, dx);
				info.floor -= floor_slant_term(sz, dz);
			},
			Some(FloorFunc::Ceiling) => {
				//x tests the opposite sign and z is added, unlike the floor
				let Slant { x, z } = Slant::from_word(cursor.next()?);
				let (sx, sz) = (x as i32, z as i32);
				info.ceiling -= (sx * if sx < 0 { dx - SECTOR_SIZE } else { dx }) >> 2;
				info.ceiling += (sz * if sz > 0 { dz - SECTOR_SIZE } else { dz }) >> 2;
			},
			Some(FloorFunc::Trigger) => {
				let kind = TriggerKind::from_code(cmd.sub())
					.ok_or(FloorFault::UnknownTriggerKind { sub: cmd.sub(), index })?;
				let info_word = TriggerInfo::new(cursor.next()?);
				let mut actions = ArrayVec::new();
				let mut words = 0;
				loop {
					let command = TriggerCommand::new(cursor.next()?);
					//an end bit on the camera command itself leaves no parameter word
					let camera = match command.action() {
						Some(Action::CameraSwitch) if !command.end() => Some(CameraParams::new(cursor.next()?)),
						_ => None,
					};
					words += 1 + camera.is_some() as usize;
					if words > MAX_TRIGGER_ACTIONS {
						return Err(Stop::Fatal(LevelError::TriggerOverflow { floor_index: index, max: MAX_TRIGGER_ACTIONS }));
					}
					let end = camera.map_or(command.end(), |camera| camera.end());
					actions.push(TriggerAction { command, camera });
					if end {
						break;
					}
				}
				info.trigger = Some(Trigger { kind, info: info_word, actions });
			},
			Some(FloorFunc::Kill) => info.kill = true,
			None => return Err(FloorFault::UnknownCommand { func: cmd.func(), index }.into()),
		}
		if cmd.end() {
			return Ok(());
		}
	}
}

/// Applies the floor data of `sector` at local `offset`.
///
/// Malformed data stops the walk with `FloorInfo.fault` set. Only a trigger with more than
/// `MAX_TRIGGER_ACTIONS` actions is an error.
pub fn floor_info(floor_data: &[u16], sector: &Sector, offset: SectorOffset) -> Result<FloorInfo> {
	let mut info = FloorInfo::flat(sector);
	if sector.floor_index == 0 {
		return Ok(info);
	}
	let mut cursor = FloorCursor { words: floor_data, index: sector.floor_index as usize };
	match walk_commands(&mut info, &mut cursor, offset) {
		Ok(()) => Ok(info),
		Err(Stop::Fault(fault)) => {
			warn!("floor data at {}: {:?}", sector.floor_index, fault);
			info.trigger = None;
			info.fault = Some(fault);
			Ok(info)
		},
		Err(Stop::Fatal(e)) => Err(e),
	}
}

impl Level {
	/// Floor, ceiling, portals and trigger at world (`x`, `z`) in room `room_index`.
	///
	/// # Panics
	/// If `room_index` is out of range.
	pub fn floor_info(&self, room_index: usize, x: i32, z: i32) -> Result<FloorInfo> {
		let (sector, offset) = self.sector(room_index, x, z);
		floor_info(&self.floor_data, sector, offset)
	}

	/// Walks the floor data of every sector. Returns the faults as (room index, sector index,
	/// fault).
	pub fn validate_floor_data(&self) -> Result<Vec<(usize, usize, FloorFault)>> {
		let mut faults = vec![];
		for (room_index, room) in self.rooms.iter().enumerate() {
			for (sector_index, sector) in room.sectors.sectors.iter().enumerate() {
				if let Some(fault) = floor_info(&self.floor_data, sector, SectorOffset::default())?.fault {
					faults.push((room_index, sector_index, fault));
				}
			}
		}
		Ok(faults)
	}
}
