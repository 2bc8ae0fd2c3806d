mod common;

use std::sync::Arc;
use common::{EntityDef, LevelBuilder};
use glam::IVec3;
use tr_level::{
	model::{Controller, Representation},
	Level, LevelError, RESERVED_ENTITIES,
};

fn level() -> Level {
	let builder = LevelBuilder {
		model_ids: vec![0, 7],
		sprite_sequences: vec![(7, 1), (150, 4)],
		entities: vec![
			EntityDef { type_id: 0, room_index: 0 },
			EntityDef { type_id: 150, room_index: 0 },
			EntityDef { type_id: 999, room_index: 0 },
		],
		..LevelBuilder::default()
	};
	Level::from_bytes(&builder.build()).unwrap()
}

fn spawn(level: &mut Level) -> Result<usize, LevelError> {
	level.entity_add(7, 0, IVec3::new(512, 0, 512), 0, None)
}

#[test]
fn declared_entities_resolve() {
	let level = level();
	assert_eq!(level.base_entity_count(), 3);
	assert_eq!(level.entity_slots().len(), 3 + RESERVED_ENTITIES);
	assert_eq!(level.entity(0).unwrap().representation, Some(Representation::Model(0)));
	assert_eq!(level.entity(1).unwrap().representation, Some(Representation::SpriteSequence(1)));
	assert_eq!(level.entity(2).unwrap().representation, None);
	assert!(level.entity(3).is_none());
	assert_eq!(level.entities().count(), 3);
}

#[test]
fn models_win_over_sprites() {
	let level = level();
	assert_eq!(level.resolve_representation(7), Some(Representation::Model(1)));
}

#[test]
fn removed_slot_is_reused() {
	let mut level = level();
	let first = spawn(&mut level).unwrap();
	assert_eq!(first, level.base_entity_count());
	level.entity_remove(first);
	assert!(level.entity(first).is_none());
	assert_eq!(spawn(&mut level).unwrap(), first);
	assert_eq!(spawn(&mut level).unwrap(), first + 1);
	assert_eq!(level.entity(first).unwrap().pos, IVec3::new(512, 0, 512));
}

#[test]
fn reserved_pool_exhausts() {
	let mut level = level();
	for _ in 0..RESERVED_ENTITIES {
		spawn(&mut level).unwrap();
	}
	assert!(matches!(spawn(&mut level), Err(LevelError::SlotExhausted { capacity: RESERVED_ENTITIES })));
	level.entity_remove(level.base_entity_count() + 10);
	assert_eq!(spawn(&mut level).unwrap(), level.base_entity_count() + 10);
}

#[test]
fn removing_declared_entity_keeps_indices() {
	let mut level = level();
	level.entity_remove(0);
	assert!(level.entity(0).is_none());
	assert_eq!(level.entity(1).unwrap().type_id, 150);
	//declared slots are not reused
	assert_eq!(spawn(&mut level).unwrap(), level.base_entity_count());
}

#[test]
fn controllers_are_weak() {
	let mut level = level();
	let controller: Arc<Controller> = Arc::new(42u32);
	assert!(level.attach_controller(0, &controller));
	assert!(!level.attach_controller(3, &controller));
	let handle = level.controller(0).unwrap();
	assert_eq!(handle.downcast_ref::<u32>(), Some(&42));
	drop(handle);
	drop(controller);
	assert!(level.controller(0).is_none());
}

#[test]
fn clone_keeps_slots() {
	let mut level = level();
	let index = spawn(&mut level).unwrap();
	let copy = level.clone();
	assert_eq!(copy.entity(index).unwrap().type_id, 7);
}
