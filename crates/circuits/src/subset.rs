// Copyright 2024-2025 Irreducible Inc.

use std::iter::FusedIterator;

use sha256air_utils::bits::pext_u32;

/// Enumerates every submask of `mask` in descending order, from `mask` down to and including 0.
///
/// The sequence has exactly `2^popcount(mask)` elements and depends on `mask` alone; cloning or
/// recreating the iterator replays it.
pub fn get_subset(mask: u32) -> SubsetIterator {
	SubsetIterator::new(mask)
}

#[derive(Debug, Clone)]
pub struct SubsetIterator {
	current: u32,
	mask: u32,
	done: bool,
}

impl SubsetIterator {
	pub const fn new(mask: u32) -> Self {
		Self {
			current: mask,
			mask,
			done: false,
		}
	}

	pub const fn mask(&self) -> u32 {
		self.mask
	}

	fn remaining(&self) -> u64 {
		if self.done {
			0
		} else {
			// The submasks still to come are exactly those whose extracted bits are <= current's.
			pext_u32(self.current, self.mask) as u64 + 1
		}
	}
}

impl Iterator for SubsetIterator {
	type Item = u32;

	#[inline]
	fn next(&mut self) -> Option<u32> {
		if self.done {
			return None;
		}
		let current = self.current;
		if current == 0 {
			self.done = true;
		} else {
			self.current = (current - 1) & self.mask;
		}
		Some(current)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		match usize::try_from(self.remaining()) {
			Ok(n) => (n, Some(n)),
			Err(_) => (usize::MAX, None),
		}
	}
}

impl ExactSizeIterator for SubsetIterator {}

impl FusedIterator for SubsetIterator {}
