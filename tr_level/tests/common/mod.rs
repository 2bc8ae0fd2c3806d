//! Writer for small synthetic level files.

#![allow(dead_code)]

use byteorder::{WriteBytesExt, LE};
use tr_level::Dialect;

pub const END: u16 = 0x8000;

#[derive(Clone, Copy)]
pub struct SectorDef {
	pub floor_index: u16,
	pub floor: i8,
	pub ceiling: i8,
}

impl SectorDef {
	pub fn flat(floor: i8) -> Self {
		SectorDef { floor_index: 0, floor, ceiling: -20 }
	}
}

pub struct RoomDef {
	pub x: i32,
	pub z: i32,
	pub x_count: u16,
	pub z_count: u16,
	/// Column major, `x_count * z_count` entries.
	pub sectors: Vec<SectorDef>,
	/// Extra words in the geometry block past the sub-lists.
	pub geom_padding: u32,
}

impl RoomDef {
	pub fn single(floor: i8) -> Self {
		RoomDef { x: 0, z: 0, x_count: 1, z_count: 1, sectors: vec![SectorDef::flat(floor)], geom_padding: 0 }
	}
}

pub struct EntityDef {
	pub type_id: u16,
	pub room_index: u16,
}

pub struct LevelBuilder {
	pub version: u32,
	pub dialect: Dialect,
	pub rooms: Vec<RoomDef>,
	pub floor_data: Vec<u16>,
	pub model_ids: Vec<u32>,
	/// (id, frame count)
	pub sprite_sequences: Vec<(i32, i16)>,
	pub num_boxes: usize,
	pub entities: Vec<EntityDef>,
	/// 6-bit value of every palette channel.
	pub palette_value: u8,
}

impl Default for LevelBuilder {
	fn default() -> Self {
		LevelBuilder {
			version: 0x20,
			dialect: Dialect::Retail,
			rooms: vec![RoomDef::single(10)],
			floor_data: vec![0],
			model_ids: vec![],
			sprite_sequences: vec![],
			num_boxes: 0,
			entities: vec![],
			palette_value: 63,
		}
	}
}

fn write_room(out: &mut Vec<u8>, room: &RoomDef) {
	out.write_i32::<LE>(room.x).unwrap();
	out.write_i32::<LE>(room.z).unwrap();
	out.write_i32::<LE>(0).unwrap();
	out.write_i32::<LE>(-5120).unwrap();
	//geometry: four empty sub-lists then padding
	out.write_u32::<LE>(4 + room.geom_padding).unwrap();
	for _ in 0..4 {
		out.write_u16::<LE>(0).unwrap();
	}
	for _ in 0..room.geom_padding {
		out.write_u16::<LE>(0xBEEF).unwrap();
	}
	out.write_u16::<LE>(0).unwrap();
	out.write_u16::<LE>(room.z_count).unwrap();
	out.write_u16::<LE>(room.x_count).unwrap();
	for sector in &room.sectors {
		out.write_u16::<LE>(sector.floor_index).unwrap();
		out.write_u16::<LE>(0xFFFF).unwrap();
		out.write_u8(255).unwrap();
		out.write_i8(sector.floor).unwrap();
		out.write_u8(255).unwrap();
		out.write_i8(sector.ceiling).unwrap();
	}
	out.write_u16::<LE>(0).unwrap();
	out.write_u16::<LE>(0).unwrap();
	out.write_u16::<LE>(0).unwrap();
	out.write_i16::<LE>(-1).unwrap();
	out.write_u16::<LE>(0).unwrap();
}

impl LevelBuilder {
	fn write_palette(&self, out: &mut Vec<u8>) {
		out.extend(std::iter::repeat(self.palette_value).take(256 * 3));
	}

	pub fn build(&self) -> Vec<u8> {
		let mut out = vec![];
		out.write_u32::<LE>(self.version).unwrap();
		out.write_u32::<LE>(0).unwrap();
		out.write_u32::<LE>(0).unwrap();
		out.write_u16::<LE>(self.rooms.len() as u16).unwrap();
		for room in &self.rooms {
			write_room(&mut out, room);
		}
		out.write_u32::<LE>(self.floor_data.len() as u32).unwrap();
		for &word in &self.floor_data {
			out.write_u16::<LE>(word).unwrap();
		}
		//mesh data, mesh offsets, animations, states, ranges, commands, mesh nodes, frames
		for _ in 0..8 {
			out.write_u32::<LE>(0).unwrap();
		}
		out.write_u32::<LE>(self.model_ids.len() as u32).unwrap();
		for &id in &self.model_ids {
			out.write_u32::<LE>(id).unwrap();
			out.write_u16::<LE>(1).unwrap();
			out.write_u16::<LE>(0).unwrap();
			out.write_u32::<LE>(0).unwrap();
			out.write_u32::<LE>(0).unwrap();
			out.write_u16::<LE>(0).unwrap();
		}
		//static meshes, object textures, sprite textures
		for _ in 0..3 {
			out.write_u32::<LE>(0).unwrap();
		}
		out.write_u32::<LE>(self.sprite_sequences.len() as u32).unwrap();
		for &(id, len) in &self.sprite_sequences {
			out.write_i32::<LE>(id).unwrap();
			out.write_i16::<LE>(-len).unwrap();
			out.write_i16::<LE>(0).unwrap();
		}
		if self.dialect == Dialect::Demo {
			self.write_palette(&mut out);
		}
		//cameras, sound sources
		out.write_u32::<LE>(0).unwrap();
		out.write_u32::<LE>(0).unwrap();
		out.write_u32::<LE>(self.num_boxes as u32).unwrap();
		for index in 0..self.num_boxes as u32 {
			out.write_u32::<LE>(index * 1024).unwrap();
			out.write_u32::<LE>(index * 1024 + 1023).unwrap();
			out.write_u32::<LE>(0).unwrap();
			out.write_u32::<LE>(1023).unwrap();
			out.write_i16::<LE>(0).unwrap();
			out.write_u16::<LE>(0).unwrap();
		}
		out.write_u32::<LE>(0).unwrap();
		for index in 0..self.num_boxes as u16 * 6 {
			out.write_u16::<LE>(index).unwrap();
		}
		out.write_u32::<LE>(0).unwrap();
		out.write_u32::<LE>(self.entities.len() as u32).unwrap();
		for entity in &self.entities {
			out.write_u16::<LE>(entity.type_id).unwrap();
			out.write_u16::<LE>(entity.room_index).unwrap();
			out.write_i32::<LE>(512).unwrap();
			out.write_i32::<LE>(0).unwrap();
			out.write_i32::<LE>(512).unwrap();
			out.write_u16::<LE>(0).unwrap();
			out.write_u16::<LE>(0xFFFF).unwrap();
			out.write_u16::<LE>(0).unwrap();
		}
		out.extend(std::iter::repeat(0).take(32 * 256));
		if self.dialect == Dialect::Retail {
			self.write_palette(&mut out);
		}
		//cinematic frames, demo data
		out.write_u16::<LE>(0).unwrap();
		out.write_u16::<LE>(0).unwrap();
		for _ in 0..256 {
			out.write_i16::<LE>(-1).unwrap();
		}
		//sound infos, sample data, sample offsets
		for _ in 0..3 {
			out.write_u32::<LE>(0).unwrap();
		}
		out
	}
}
