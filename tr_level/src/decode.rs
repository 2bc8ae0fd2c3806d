/*!
Ordered decode plan.

A level file is a sequence of sections with no directory: each section's shape depends on counts and
tables read before it. The plan names every section and what it depends on, and is run top to bottom
against a level that stays private until every step succeeds.
*/

use std::{fmt, io::Result};
use byteorder::{ReadBytesExt, LE};
use log::{debug, warn};
use crate::{
	error::LevelError,
	model::{
		boxes::BoxData, entity::EntityRecord, texture::PALETTE_LEN, sound::SOUND_MAP_LEN, EntitySlot,
		Entity, Level, Rgb, LIGHT_MAP_LEN,
	},
	read_boxed_slice, read_byte_list, read_list, skip, ByteReader, RESERVED_ENTITIES,
};

/// Version tag of retail TR1 levels.
pub const VERSION_TR1: u32 = 0x20;

/// Variant of the format, selecting where the palette is stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dialect {
	/// Palette after the entities and light map.
	#[default]
	Retail,
	/// Palette after the sprite sequences, as in the demo release.
	Demo,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
	/// Forces the dialect, and accepts any version tag. If `None`, the version tag must be
	/// `VERSION_TR1` and the dialect is `Retail`.
	pub dialect: Option<Dialect>,
}

impl LoadOptions {
	pub fn dialect(mut self, dialect: Dialect) -> Self {
		self.dialect = Some(dialect);
		self
	}
}

macro_rules! decl_steps {
	($($step:ident => $name:literal,)*) => {
		/// One section of the level file, or a fix-up over sections already read.
		#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
		pub enum Step {
			$($step,)*
		}

		impl Step {
			pub fn name(self) -> &'static str {
				match self {
					$(Step::$step => $name,)*
				}
			}
		}
	};
}

decl_steps! {
	Version => "version",
	Tiles => "tiles",
	Unused => "unused word",
	Rooms => "rooms",
	FloorData => "floor data",
	MeshData => "mesh data",
	MeshOffsets => "mesh offsets",
	Animations => "animations",
	AnimStates => "animation states",
	AnimRanges => "animation ranges",
	AnimCommands => "animation commands",
	MeshNodes => "mesh nodes",
	Frames => "frames",
	Models => "models",
	StaticMeshes => "static meshes",
	ObjectTextures => "object textures",
	SpriteTextures => "sprite textures",
	SpriteSequences => "sprite sequences",
	Palette => "palette",
	Cameras => "cameras",
	SoundSources => "sound sources",
	Boxes => "boxes",
	Overlaps => "overlaps",
	Zones => "zones",
	AnimatedTextures => "animated textures",
	Entities => "entities",
	LightMap => "light map",
	CinematicFrames => "cinematic frames",
	DemoData => "demo data",
	SoundMap => "sound map",
	SoundInfos => "sound infos",
	SampleData => "sample data",
	SampleOffsets => "sample offsets",
	NormalizePalette => "palette normalization",
}

impl fmt::Display for Step {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

type StepFn = fn(&mut ByteReader, &mut Level) -> Result<()>;

pub struct DecodeStep {
	pub step: Step,
	/// Steps that must have run first: the previous section in the file, and any section whose
	/// counts or tables this one uses.
	pub after: &'static [Step],
	read: StepFn,
}

fn step(step: Step, after: &'static [Step], read: StepFn) -> DecodeStep {
	DecodeStep { step, after, read }
}

//section readers

fn read_version(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.version = reader.read_u32::<LE>()?;
	Ok(())
}

fn read_tiles(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.tiles = read_list::<_, _, u32>(reader)?;
	Ok(())
}

fn read_unused(reader: &mut ByteReader, _: &mut Level) -> Result<()> {
	reader.read_u32::<LE>()?;
	Ok(())
}

fn read_rooms(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.rooms = read_list::<_, _, u16>(reader)?;
	Ok(())
}

fn read_floor_data(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.floor_data = read_list::<_, _, u32>(reader)?;
	Ok(())
}

fn read_mesh_data(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	let num_words = reader.read_u32::<LE>()? as usize;
	level.mesh_data = crate::read_bytes(reader, num_words * 2)?;
	Ok(())
}

fn read_mesh_offsets(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.mesh_offsets = read_list::<_, _, u32>(reader)?;
	Ok(())
}

fn read_animations(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.animations = read_list::<_, _, u32>(reader)?;
	Ok(())
}

fn read_anim_states(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.anim_states = read_list::<_, _, u32>(reader)?;
	Ok(())
}

fn read_anim_ranges(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.anim_ranges = read_list::<_, _, u32>(reader)?;
	Ok(())
}

fn read_anim_commands(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.anim_commands = read_list::<_, _, u32>(reader)?;
	Ok(())
}

fn read_mesh_nodes(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.mesh_node_data = read_list::<_, _, u32>(reader)?;
	Ok(())
}

fn read_frames(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.frame_data = read_list::<_, _, u32>(reader)?;
	Ok(())
}

fn read_models(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.models = read_list::<_, _, u32>(reader)?;
	Ok(())
}

fn read_static_meshes(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.static_meshes = read_list::<_, _, u32>(reader)?;
	Ok(())
}

fn read_object_textures(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.object_textures = read_list::<_, _, u32>(reader)?;
	Ok(())
}

fn read_sprite_textures(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.sprite_textures = read_list::<_, _, u32>(reader)?;
	Ok(())
}

fn read_sprite_sequences(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.sprite_sequences = read_list::<_, _, u32>(reader)?;
	for sequence in level.sprite_sequences.iter_mut() {
		sequence.len = sequence.len.saturating_neg();
	}
	Ok(())
}

fn read_palette(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.palette = read_boxed_slice::<_, Rgb>(reader, PALETTE_LEN)?;
	Ok(())
}

fn read_cameras(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.cameras = read_list::<_, _, u32>(reader)?;
	Ok(())
}

fn read_sound_sources(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.sound_sources = read_list::<_, _, u32>(reader)?;
	Ok(())
}

fn read_boxes(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.box_data = BoxData { boxes: read_list::<_, _, u32>(reader)?, ..BoxData::default() };
	Ok(())
}

fn read_overlaps(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.box_data.overlaps = read_list::<_, _, u32>(reader)?;
	Ok(())
}

fn read_zones(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.box_data.zones = read_boxed_slice(reader, level.box_data.boxes.len())?;
	Ok(())
}

fn read_animated_textures(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.animated_textures = read_list::<_, _, u32>(reader)?;
	Ok(())
}

fn read_entities(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	let records = read_list::<_, EntityRecord, u32>(reader)?;
	let mut entities = Vec::with_capacity(records.len() + RESERVED_ENTITIES);
	for record in records.iter() {
		let representation = level.resolve_representation(record.type_id);
		if representation.is_none() {
			warn!("entity type {} in room {} has no model or sprite sequence", record.type_id, record.room_index);
		}
		entities.push(EntitySlot::Occupied(Entity::new(*record, representation)));
	}
	entities.resize_with(records.len() + RESERVED_ENTITIES, EntitySlot::default);
	level.base_entity_count = records.len();
	level.entities = entities.into_boxed_slice();
	Ok(())
}

fn read_light_map(reader: &mut ByteReader, _: &mut Level) -> Result<()> {
	skip(reader, (LIGHT_MAP_LEN * PALETTE_LEN) as i64)
}

fn read_cinematic_frames(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.cinematic_frames = read_list::<_, _, u16>(reader)?;
	Ok(())
}

fn read_demo_data(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.demo_data = read_byte_list::<_, u16>(reader)?;
	Ok(())
}

fn read_sound_map(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.sound_map = read_boxed_slice(reader, SOUND_MAP_LEN)?;
	Ok(())
}

fn read_sound_infos(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.sound_infos = read_list::<_, _, u32>(reader)?;
	Ok(())
}

fn read_sample_data(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.sample_data = read_byte_list::<_, u32>(reader)?;
	Ok(())
}

fn read_sample_offsets(reader: &mut ByteReader, level: &mut Level) -> Result<()> {
	level.sample_offsets = read_list::<_, _, u32>(reader)?;
	Ok(())
}

fn normalize_palette(_: &mut ByteReader, level: &mut Level) -> Result<()> {
	for color in level.palette.iter_mut() {
		*color = color.from_6_bit();
	}
	Ok(())
}

/// Steps for `dialect`, in file order.
pub fn decode_plan(dialect: Dialect) -> Vec<DecodeStep> {
	use Step::*;
	let mut plan = vec![
		step(Version, &[], read_version),
		step(Tiles, &[Version], read_tiles),
		step(Unused, &[Tiles], read_unused),
		step(Rooms, &[Unused], read_rooms),
		step(FloorData, &[Rooms], read_floor_data),
		step(MeshData, &[FloorData], read_mesh_data),
		step(MeshOffsets, &[MeshData], read_mesh_offsets),
		step(Animations, &[MeshOffsets], read_animations),
		step(AnimStates, &[Animations], read_anim_states),
		step(AnimRanges, &[AnimStates], read_anim_ranges),
		step(AnimCommands, &[AnimRanges], read_anim_commands),
		step(MeshNodes, &[AnimCommands], read_mesh_nodes),
		step(Frames, &[MeshNodes], read_frames),
		step(Models, &[Frames], read_models),
		step(StaticMeshes, &[Models], read_static_meshes),
		step(ObjectTextures, &[StaticMeshes], read_object_textures),
		step(SpriteTextures, &[ObjectTextures], read_sprite_textures),
		step(SpriteSequences, &[SpriteTextures], read_sprite_sequences),
	];
	match dialect {
		Dialect::Demo => plan.extend([
			step(Palette, &[SpriteSequences], read_palette),
			step(Cameras, &[Palette], read_cameras),
		]),
		Dialect::Retail => plan.push(step(Cameras, &[SpriteSequences], read_cameras)),
	}
	plan.extend([
		step(SoundSources, &[Cameras], read_sound_sources),
		step(Boxes, &[SoundSources], read_boxes),
		step(Overlaps, &[Boxes], read_overlaps),
		step(Zones, &[Overlaps, Boxes], read_zones),
		step(AnimatedTextures, &[Zones], read_animated_textures),
		step(Entities, &[AnimatedTextures, Models, SpriteSequences], read_entities),
		step(LightMap, &[Entities], read_light_map),
	]);
	match dialect {
		Dialect::Demo => plan.push(step(CinematicFrames, &[LightMap], read_cinematic_frames)),
		Dialect::Retail => plan.extend([
			step(Palette, &[LightMap], read_palette),
			step(CinematicFrames, &[Palette], read_cinematic_frames),
		]),
	}
	plan.extend([
		step(DemoData, &[CinematicFrames], read_demo_data),
		step(SoundMap, &[DemoData], read_sound_map),
		step(SoundInfos, &[SoundMap], read_sound_infos),
		step(SampleData, &[SoundInfos], read_sample_data),
		step(SampleOffsets, &[SampleData], read_sample_offsets),
		step(NormalizePalette, &[Palette, SampleOffsets], normalize_palette),
	]);
	plan
}

/// First step which is repeated or runs before one of its `after` steps.
pub fn validate_plan(plan: &[DecodeStep]) -> std::result::Result<(), Step> {
	for (index, decode_step) in plan.iter().enumerate() {
		let earlier = &plan[..index];
		let repeated = earlier.iter().any(|other| other.step == decode_step.step);
		let ordered = decode_step.after.iter().all(|after| earlier.iter().any(|other| other.step == *after));
		if repeated || !ordered {
			return Err(decode_step.step);
		}
	}
	Ok(())
}

fn peek_version(bytes: &[u8]) -> crate::error::Result<u32> {
	ByteReader::new(bytes).read_u32::<LE>().map_err(|source| LevelError::CorruptFormat {
		step: Step::Version,
		offset: 0,
		source,
	})
}

impl Level {
	/// Decodes a retail TR1 level.
	pub fn from_bytes(bytes: &[u8]) -> crate::error::Result<Self> {
		Self::load(bytes, &LoadOptions::default())
	}

	pub fn load(bytes: &[u8], options: &LoadOptions) -> crate::error::Result<Self> {
		let version = peek_version(bytes)?;
		let dialect = match options.dialect {
			Some(dialect) => dialect,
			None if version == VERSION_TR1 => Dialect::Retail,
			None => return Err(LevelError::UnsupportedVersion(version)),
		};
		let mut level = Level { dialect, ..Level::default() };
		let mut reader = ByteReader::new(bytes);
		for DecodeStep { step, read, .. } in decode_plan(dialect) {
			let offset = reader.pos();
			read(&mut reader, &mut level).map_err(|source| LevelError::CorruptFormat { step, offset, source })?;
			debug!("{}: bytes {}..{}", step, offset, reader.pos());
		}
		if reader.remaining() > 0 {
			debug!("{} trailing bytes after level data", reader.remaining());
		}
		Ok(level)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn position(plan: &[DecodeStep], step: Step) -> usize {
		plan.iter().position(|decode_step| decode_step.step == step).unwrap()
	}

	#[test]
	fn plans_are_ordered() {
		assert_eq!(validate_plan(&decode_plan(Dialect::Retail)), Ok(()));
		assert_eq!(validate_plan(&decode_plan(Dialect::Demo)), Ok(()));
	}

	#[test]
	fn palette_position_follows_dialect() {
		let retail = decode_plan(Dialect::Retail);
		assert!(position(&retail, Step::Palette) > position(&retail, Step::LightMap));
		let demo = decode_plan(Dialect::Demo);
		assert!(position(&demo, Step::Palette) < position(&demo, Step::Cameras));
		assert!(position(&demo, Step::Palette) > position(&demo, Step::SpriteSequences));
		assert_eq!(retail.len(), demo.len());
	}

	#[test]
	fn validation_catches_misordering() {
		let mut plan = decode_plan(Dialect::Retail);
		let zones = plan.remove(position(&plan, Step::Zones));
		plan.insert(position(&plan, Step::Boxes), zones);
		assert_eq!(validate_plan(&plan), Err(Step::Zones));
		let mut plan = decode_plan(Dialect::Retail);
		plan.push(step(Step::Rooms, &[], read_rooms));
		assert_eq!(validate_plan(&plan), Err(Step::Rooms));
	}

	#[test]
	fn sprite_length_negation_saturates() {
		let mut bytes = 2u32.to_le_bytes().to_vec();
		for len in [i16::MIN, -3] {
			bytes.extend(190i32.to_le_bytes());
			bytes.extend(len.to_le_bytes());
			bytes.extend(0i16.to_le_bytes());
		}
		let mut level = Level::default();
		read_sprite_sequences(&mut ByteReader::new(&bytes), &mut level).unwrap();
		let lens = level.sprite_sequences.iter().map(|sequence| sequence.len).collect::<Vec<_>>();
		assert_eq!(lens, [i16::MAX, 3]);
	}

	#[test]
	fn short_buffer_fails_on_version() {
		let err = Level::from_bytes(&[0x20, 0]).unwrap_err();
		assert!(matches!(err, LevelError::CorruptFormat { step: Step::Version, offset: 0, .. }));
	}

	#[test]
	fn unknown_version_rejected() {
		let err = Level::from_bytes(&[0x2D, 0, 0, 0]).unwrap_err();
		assert!(matches!(err, LevelError::UnsupportedVersion(0x2D)));
	}
}
