use std::{any::Any, sync::Weak};
use bitfield::bitfield;
use glam::IVec3;
use nonmax::NonMaxU16;
use crate::Readable;

/// Gameplay-side state attached to an entity. The level only ever holds it weakly.
pub type Controller = dyn Any + Send + Sync;

bitfield! {
	#[derive(Readable, Clone, Copy, Default, PartialEq, Eq)]
	pub struct EntityFlags(u16);
	impl Debug;
	pub clear_body, set_clear_body: 7;
	pub invisible, set_invisible: 8;
	/// Toggled by trigger masks, all bits set means active.
	pub u8, activation_mask, set_activation_mask: 13, 9;
}

pub const ACTIVATION_MASK_FULL: u8 = 0x1F;

/// `EntityFlags` fields as masks of the raw word.
pub const FLAG_CLEAR_BODY: u16 = 0x0080;
pub const FLAG_INVISIBLE: u16 = 0x0100;
pub const FLAG_ACTIVATION_MASK: u16 = 0x3E00;

/// Known `Entity.type_id` values.
pub mod type_id {
	pub const LARA: u16 = 0;

	pub const ENEMY_TWIN: u16 = 6;
	pub const ENEMY_WOLF: u16 = 7;
	pub const ENEMY_BEAR: u16 = 8;
	pub const ENEMY_BAT: u16 = 9;
	pub const ENEMY_CROCODILE_LAND: u16 = 10;
	pub const ENEMY_CROCODILE_WATER: u16 = 11;
	pub const ENEMY_LION_MALE: u16 = 12;
	pub const ENEMY_LION_FEMALE: u16 = 13;
	pub const ENEMY_PUMA: u16 = 14;
	pub const ENEMY_GORILLA: u16 = 15;
	pub const ENEMY_RAT_LAND: u16 = 16;
	pub const ENEMY_RAT_WATER: u16 = 17;
	pub const ENEMY_REX: u16 = 18;
	pub const ENEMY_RAPTOR: u16 = 19;
	pub const ENEMY_MUTANT: u16 = 20;
	pub const ENEMY_CENTAUR: u16 = 23;
	pub const ENEMY_MUMMY: u16 = 24;
	pub const ENEMY_LARSON: u16 = 27;

	pub const TRAP_FLOOR: u16 = 35;
	pub const TRAP_BLADE: u16 = 36;
	pub const TRAP_SPIKES: u16 = 37;
	pub const TRAP_BOULDER: u16 = 38;
	pub const TRAP_DART: u16 = 39;
	pub const TRAP_DARTGUN: u16 = 40;

	pub const SWITCH: u16 = 55;
	pub const SWITCH_WATER: u16 = 56;
	pub const DOOR_1: u16 = 57;
	pub const DOOR_2: u16 = 58;
	pub const DOOR_3: u16 = 59;
	pub const DOOR_4: u16 = 60;
	pub const DOOR_BIG_1: u16 = 61;
	pub const DOOR_BIG_2: u16 = 62;
	pub const DOOR_5: u16 = 63;
	pub const DOOR_6: u16 = 64;
	pub const DOOR_FLOOR_1: u16 = 65;
	pub const DOOR_FLOOR_2: u16 = 66;

	pub const LARA_CUT: u16 = 77;

	//sprites from here on unless noted
	pub const CRYSTAL: u16 = 83;
	pub const WEAPON_PISTOLS: u16 = 84;
	pub const WEAPON_SHOTGUN: u16 = 85;
	pub const WEAPON_MAGNUMS: u16 = 86;
	pub const WEAPON_UZIS: u16 = 87;
	pub const AMMO_SHOTGUN: u16 = 89;
	pub const AMMO_MAGNUMS: u16 = 90;
	pub const AMMO_UZIS: u16 = 91;
	pub const MEDIKIT_SMALL: u16 = 93;
	pub const MEDIKIT_BIG: u16 = 94;
	/// Model.
	pub const HOLE_PUZZLE: u16 = 118;
	/// Model.
	pub const HOLE_KEY: u16 = 137;
	pub const ARTIFACT: u16 = 143;
	pub const WATER_SPLASH: u16 = 153;
	pub const BUBBLE: u16 = 155;
	pub const BLOOD: u16 = 158;
	pub const SMOKE: u16 = 160;
	pub const SPARK: u16 = 164;
	/// Model.
	pub const VIEW_TARGET: u16 = 169;
	pub const GLYPH: u16 = 190;

	pub fn is_enemy(type_id: u16) -> bool {
		(ENEMY_TWIN..=ENEMY_LARSON).contains(&type_id)
	}

	pub fn is_door(type_id: u16) -> bool {
		(DOOR_1..=DOOR_FLOOR_2).contains(&type_id)
	}
}

/// Entity record as stored in the file.
#[derive(Readable, Clone, Copy, Debug)]
pub struct EntityRecord {
	pub type_id: u16,
	pub room_index: u16,
	pub pos: IVec3,
	pub angle: u16,
	pub intensity: Option<NonMaxU16>,
	pub flags: EntityFlags,
}

/// What an entity is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Representation {
	/// Index into `Level.models`.
	Model(usize),
	/// Index into `Level.sprite_sequences`.
	SpriteSequence(usize),
}

#[derive(Clone, Debug)]
pub struct Entity {
	/// Matched to `Model.id` or `SpriteSequence.id`.
	pub type_id: u16,
	/// Index into `Level.rooms`.
	pub room_index: u16,
	/// World coords.
	pub pos: IVec3,
	/// Yaw, units are 1/65536 of a rotation.
	pub angle: u16,
	/// Constant lighting. If `None`, use mesh lighting.
	pub intensity: Option<NonMaxU16>,
	pub flags: EntityFlags,
	/// `None` if `type_id` matches no model or sprite sequence.
	pub representation: Option<Representation>,
	pub(crate) controller: Option<Weak<Controller>>,
}

impl Entity {
	pub(crate) fn new(record: EntityRecord, representation: Option<Representation>) -> Self {
		Entity {
			type_id: record.type_id,
			room_index: record.room_index,
			pos: record.pos,
			angle: record.angle,
			intensity: record.intensity,
			flags: record.flags,
			representation,
			controller: None,
		}
	}

	/// XORs a trigger mask into the activation mask. Returns whether the entity is now fully active.
	pub fn toggle_activation(&mut self, mask: u8) -> bool {
		let toggled = (self.flags.activation_mask() ^ mask) & ACTIVATION_MASK_FULL;
		self.flags.set_activation_mask(toggled);
		toggled == ACTIVATION_MASK_FULL
	}
}

/// One slot of `Level.entities`. Slots never move, so an index stays valid for the level's lifetime.
#[derive(Clone, Debug, Default)]
pub enum EntitySlot {
	#[default]
	Empty,
	Occupied(Entity),
}

impl EntitySlot {
	pub fn is_empty(&self) -> bool {
		matches!(self, EntitySlot::Empty)
	}

	pub fn entity(&self) -> Option<&Entity> {
		match self {
			EntitySlot::Empty => None,
			EntitySlot::Occupied(entity) => Some(entity),
		}
	}

	pub fn entity_mut(&mut self) -> Option<&mut Entity> {
		match self {
			EntitySlot::Empty => None,
			EntitySlot::Occupied(entity) => Some(entity),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn flag_fields() {
		let flags = EntityFlags(FLAG_ACTIVATION_MASK | FLAG_INVISIBLE);
		assert!(flags.invisible());
		assert!(!flags.clear_body());
		assert_eq!(flags.activation_mask(), ACTIVATION_MASK_FULL);
		let mut flags = EntityFlags::default();
		flags.set_clear_body(true);
		assert_eq!(flags.0, FLAG_CLEAR_BODY);
		flags.set_activation_mask(ACTIVATION_MASK_FULL);
		assert_eq!(flags.0 & FLAG_ACTIVATION_MASK, FLAG_ACTIVATION_MASK);
	}

	#[test]
	fn type_id_groups() {
		assert!(type_id::is_enemy(type_id::ENEMY_TWIN));
		assert!(type_id::is_enemy(type_id::ENEMY_LARSON));
		assert!(!type_id::is_enemy(type_id::LARA));
		assert!(!type_id::is_enemy(type_id::TRAP_FLOOR));
		assert!(type_id::is_door(type_id::DOOR_FLOOR_2));
		assert!(!type_id::is_door(type_id::SWITCH_WATER));
	}

	#[test]
	fn activation_toggles_by_xor() {
		let record = EntityRecord {
			type_id: type_id::SWITCH,
			room_index: 0,
			pos: IVec3::ZERO,
			angle: 0,
			intensity: None,
			flags: EntityFlags(0x0100),
		};
		let mut entity = Entity::new(record, None);
		assert!(!entity.toggle_activation(0b00111));
		assert!(entity.toggle_activation(0b11000));
		assert_eq!(entity.flags.0, 0x3E00 | 0x0100);
		assert!(!entity.toggle_activation(0b00001));
		assert_eq!(entity.flags.activation_mask(), 0b11110);
	}
}
