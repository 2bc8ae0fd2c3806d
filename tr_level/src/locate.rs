use crate::model::{room::SECTOR_SIZE, Level, Sector};

/// Position within a sector, each axis in `0..SECTOR_SIZE`. Always 0 on an axis whose position lies in
/// the last row or column of the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectorOffset {
	pub dx: i32,
	pub dz: i32,
}

impl Level {
	/// Sector of room `room_index` under world (`x`, `z`). Positions outside the room resolve to the
	/// nearest edge sector. Room-local coords are clamped to the start of the last sector on each axis.
	///
	/// # Panics
	/// If `room_index` is out of range or the room has no sectors.
	pub fn sector(&self, room_index: usize, x: i32, z: i32) -> (&Sector, SectorOffset) {
		let room = &self.rooms[room_index];
		let sectors = &room.sectors;
		assert!(!sectors.sectors.is_empty(), "room {} has no sectors", room_index);
		let sx = x.saturating_sub(room.info.x).clamp(0, (sectors.x_count as i32 - 1) * SECTOR_SIZE);
		let sz = z.saturating_sub(room.info.z).clamp(0, (sectors.z_count as i32 - 1) * SECTOR_SIZE);
		let offset = SectorOffset { dx: sx % SECTOR_SIZE, dz: sz % SECTOR_SIZE };
		let index = (sx / SECTOR_SIZE) as usize * sectors.z_count as usize + (sz / SECTOR_SIZE) as usize;
		(&sectors.sectors[index], offset)
	}
}
