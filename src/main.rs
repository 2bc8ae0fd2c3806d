use std::{fmt::Display, fs, path::PathBuf, process::ExitCode};
use clap::Parser;
use log::info;
use tr_level::{model::entity::type_id, Dialect, Level, LoadOptions};

trait OrExit<T> {
	fn or_exit<M: Display>(self, msg: M) -> Result<T, ExitCode>;
}

impl<T, E: Display> OrExit<T> for Result<T, E> {
	fn or_exit<M: Display>(self, msg: M) -> Result<T, ExitCode> {
		self.map_err(|e| {
			eprintln!("{}: {}", msg, e);
			ExitCode::FAILURE
		})
	}
}

#[derive(Parser, Debug)]
#[command(version, about = "Decodes a TR1 level and prints what it holds")]
struct Args {
	/// Level file
	path: PathBuf,
	/// Decode with the demo layout, palette ahead of the cameras
	#[arg(long)]
	demo: bool,
	/// Room to query floor info in, with world x and z
	#[arg(requires = "x")]
	room: Option<usize>,
	#[arg(requires = "z", allow_negative_numbers = true)]
	x: Option<i32>,
	#[arg(allow_negative_numbers = true)]
	z: Option<i32>,
}

impl Args {
	fn options(&self) -> LoadOptions {
		let options = LoadOptions::default();
		if self.demo {
			options.dialect(Dialect::Demo)
		} else {
			options
		}
	}

	fn query(&self) -> Option<(usize, i32, i32)> {
		Some((self.room?, self.x?, self.z?))
	}
}

fn print_summary(level: &Level) {
	println!("version {:#x} ({:?})", level.version, level.dialect);
	println!("tiles: {}", level.tiles.len());
	println!("rooms: {}", level.rooms.len());
	for (index, room) in level.rooms.iter().enumerate() {
		let sectors = &room.sectors;
		print!("  {}: at ({}, {}), {}x{} sectors", index, room.info.x, room.info.z, sectors.x_count, sectors.z_count);
		if let Some(bounds) = room.vertex_bounds() {
			print!(", vertices {} to {}", bounds.min, bounds.max);
		}
		if let Some(alternate) = room.alternate_room_index() {
			print!(", alternate {}", alternate);
		}
		println!();
	}
	println!("floor data words: {}", level.floor_data.len());
	println!("meshes: {}", level.mesh_offsets.len());
	println!("animations: {}", level.animations.len());
	println!("models: {}", level.models.len());
	println!("static meshes: {}", level.static_meshes.len());
	println!("object textures: {}", level.object_textures.len());
	println!("sprite sequences: {}", level.sprite_sequences.len());
	println!("cameras: {}", level.cameras.len());
	println!("boxes: {}, overlaps: {}", level.box_data.boxes.len(), level.box_data.overlaps.len());
	let unresolved = level.entities().filter(|(_, entity)| entity.representation.is_none()).count();
	println!("entities: {} ({} unresolved)", level.base_entity_count(), unresolved);
	if let Some((index, entity)) = level.entities().find(|(_, entity)| entity.type_id == type_id::LARA) {
		println!("  lara: entity {} in room {}", index, entity.room_index);
	}
	let enemies = level.entities().filter(|(_, entity)| type_id::is_enemy(entity.type_id)).count();
	let doors = level.entities().filter(|(_, entity)| type_id::is_door(entity.type_id)).count();
	println!("  enemies: {}, doors: {}", enemies, doors);
	println!("sound infos: {}, samples: {}", level.sound_infos.len(), level.sample_offsets.len());
}

fn run() -> Result<(), ExitCode> {
	let args = Args::parse();
	let path = args.path.display();
	let bytes = fs::read(&args.path).or_exit(&path)?;
	let level = Level::load(&bytes, &args.options()).or_exit(&path)?;
	info!("decoded {} bytes", bytes.len());
	print_summary(&level);
	let faults = level.validate_floor_data().or_exit("floor data")?;
	println!("floor data faults: {}", faults.len());
	for (room, sector, fault) in faults {
		println!("  room {} sector {}: {:?}", room, sector, fault);
	}
	if let Some((room, x, z)) = args.query() {
		if room >= level.rooms.len() {
			eprintln!("room {} out of range {}", room, level.rooms.len());
			return Err(ExitCode::FAILURE);
		}
		let info = level.floor_info(room, x, z).or_exit("floor info")?;
		println!("{:#?}", info);
	}
	Ok(())
}

fn main() -> ExitCode {
	env_logger::init();
	match run() {
		Ok(()) => ExitCode::SUCCESS,
		Err(code) => code,
	}
}
