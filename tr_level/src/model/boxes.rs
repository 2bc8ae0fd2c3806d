use bitfield::bitfield;
use shared::{MinMax, ScalarMinMax};
use crate::Readable;

/// Pathing rectangle for creature AI.
#[derive(Readable, Clone, Copy, Debug)]
pub struct TrBox {
	/// World coords.
	pub z: MinMax<u32>,
	/// World coords.
	pub x: MinMax<u32>,
	pub floor: i16,
	/// Index into `BoxData.overlaps` of this box's first neighbour.
	pub overlap_index: u16,
}

impl TrBox {
	pub fn contains(&self, x: u32, z: u32) -> bool {
		self.x.contains_value(x) && self.z.contains_value(z)
	}
}

bitfield! {
	#[derive(Readable, Clone, Copy)]
	pub struct Overlap(u16);
	impl Debug;
	/// Index into `BoxData.boxes`.
	pub u16, box_index, _: 14, 0;
	/// Last neighbour of the list.
	pub end, _: 15;
}

#[derive(Readable, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZoneIds {
	pub ground_zone1: u16,
	pub ground_zone2: u16,
	pub fly_zone: u16,
}

/// Navigation partition of one box, with the flip map off and on.
#[derive(Readable, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Zone {
	pub normal: ZoneIds,
	pub alternate: ZoneIds,
}

/// `zones` is parallel to `boxes`.
#[derive(Clone, Debug, Default)]
pub struct BoxData {
	pub boxes: Box<[TrBox]>,
	pub overlaps: Box<[Overlap]>,
	pub zones: Box<[Zone]>,
}

impl BoxData {
	/// Neighbours of `box_index`, through the entry with the end bit set. Stops at the end of
	/// `overlaps` if the list is unterminated.
	pub fn overlaps_of(&self, box_index: usize) -> impl Iterator<Item = usize> + '_ {
		let start = self.boxes.get(box_index).map_or(self.overlaps.len(), |b| b.overlap_index as usize);
		let mut done = false;
		self.overlaps.get(start..).unwrap_or_default().iter().map_while(move |overlap| {
			if done {
				return None;
			}
			done = overlap.end();
			Some(overlap.box_index() as usize)
		})
	}

	pub fn zone(&self, box_index: usize, flipped: bool) -> Option<&ZoneIds> {
		self.zones.get(box_index).map(|zone| if flipped { &zone.alternate } else { &zone.normal })
	}
}
