use std::sync::{Arc, Weak};
use glam::IVec3;
use log::warn;
use nonmax::NonMaxU16;
use crate::{
	error::{LevelError, Result},
	model::{entity::{EntityFlags, EntityRecord}, Controller, Entity, EntitySlot, Level},
};

/// Empty slots appended after the file-declared entities, for entities spawned during play.
pub const RESERVED_ENTITIES: usize = 64;

impl Level {
	/// Fills the first empty reserved slot and returns its index.
	pub fn entity_add(
		&mut self, type_id: u16, room_index: u16, pos: IVec3, angle: u16, intensity: Option<NonMaxU16>,
	) -> Result<usize> {
		let capacity = self.entities.len() - self.base_entity_count;
		let index = self.entities[self.base_entity_count..]
			.iter()
			.position(EntitySlot::is_empty)
			.ok_or(LevelError::SlotExhausted { capacity })?
			+ self.base_entity_count;
		let record = EntityRecord { type_id, room_index, pos, angle, intensity, flags: EntityFlags::default() };
		let representation = self.resolve_representation(type_id);
		if representation.is_none() {
			warn!("spawned entity type {} has no model or sprite sequence", type_id);
		}
		self.entities[index] = EntitySlot::Occupied(Entity::new(record, representation));
		Ok(index)
	}

	/// Empties slot `index`, dropping its controller handle. Other slots keep their indices.
	///
	/// # Panics
	/// If `index` is out of range.
	pub fn entity_remove(&mut self, index: usize) {
		assert!(index < self.entities.len(), "entity index {} out of range {}", index, self.entities.len());
		self.entities[index] = EntitySlot::Empty;
	}

	pub fn entity(&self, index: usize) -> Option<&Entity> {
		self.entities.get(index)?.entity()
	}

	pub fn entity_mut(&mut self, index: usize) -> Option<&mut Entity> {
		self.entities.get_mut(index)?.entity_mut()
	}

	/// Occupied slots with their indices.
	pub fn entities(&self) -> impl Iterator<Item = (usize, &Entity)> {
		self.entities.iter().enumerate().filter_map(|(index, slot)| Some((index, slot.entity()?)))
	}

	pub fn entity_slots(&self) -> &[EntitySlot] {
		&self.entities
	}

	/// Number of entities declared in the file, which is also the first reserved slot index.
	pub fn base_entity_count(&self) -> usize {
		self.base_entity_count
	}

	/// Attaches `controller` to the entity at `index` by weak reference. Returns false if the slot is
	/// empty or out of range.
	pub fn attach_controller(&mut self, index: usize, controller: &Arc<Controller>) -> bool {
		match self.entity_mut(index) {
			Some(entity) => {
				entity.controller = Some(Arc::downgrade(controller));
				true
			},
			None => false,
		}
	}

	/// Controller of the entity at `index`, if attached and still alive.
	pub fn controller(&self, index: usize) -> Option<Arc<Controller>> {
		self.entity(index)?.controller.as_ref().and_then(Weak::upgrade)
	}
}
