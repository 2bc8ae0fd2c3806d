use glam_traits::GVec;

/// A range on each axis, stored as its two inclusive ends.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MinMax<T> {
	pub min: T,
	pub max: T,
}

impl<T> MinMax<T> where T: Clone {
	pub fn new(a: T) -> Self {
		Self { min: a.clone(), max: a }
	}
}

pub trait ScalarMinMax<T> {
	/// Inclusive on both ends.
	fn contains_value(&self, a: T) -> bool;
}

impl<T> ScalarMinMax<T> for MinMax<T> where T: Copy + Ord {
	fn contains_value(&self, a: T) -> bool {
		self.min <= a && a <= self.max
	}
}

pub trait VecMinMax<T> {
	fn update(&mut self, v: T);
}

impl<T> VecMinMax<T> for MinMax<T> where T: GVec {
	fn update(&mut self, a: T) {
		self.min = self.min.min(a);
		self.max = self.max.max(a);
	}
}

pub trait VecMinMaxFromIterator: Iterator {
	fn min_max(self) -> Option<MinMax<Self::Item>>;
}

impl<T> VecMinMaxFromIterator for T where T: Iterator, T::Item: GVec {
	fn min_max(mut self) -> Option<MinMax<Self::Item>> {
		let mut min_max = MinMax::new(self.next()?);
		for a in self {
			min_max.update(a);
		}
		Some(min_max)
	}
}
