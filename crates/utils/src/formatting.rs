// Copyright 2025 Irreducible Inc.

use std::fmt;

/// Displays a mask as a zero-padded bit pattern of `width` bits followed by its popcount.
///
/// `MaskBits::new("I0", 0b1011, 8)` renders as `I0: 00001011: 3 bits`.
#[derive(Debug, Clone, Copy)]
pub struct MaskBits<'a> {
	name: &'a str,
	mask: u32,
	width: usize,
}

impl<'a> MaskBits<'a> {
	pub fn new(name: &'a str, mask: u32, width: usize) -> Self {
		Self { name, mask, width }
	}
}

impl fmt::Display for MaskBits<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}: {:0width$b}: {} bits",
			self.name,
			self.mask,
			self.mask.count_ones(),
			width = self.width
		)
	}
}
