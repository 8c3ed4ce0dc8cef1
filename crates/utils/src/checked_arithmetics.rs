// Copyright 2024 Irreducible Inc.

/// Number of entries in a domain keyed by `n_bits` free bits, failing above `usize::BITS`.
pub const fn checked_domain_size(n_bits: u32) -> usize {
	assert!(n_bits < usize::BITS);

	1 << n_bits
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_checked_domain_size() {
		assert_eq!(checked_domain_size(0), 1);
		assert_eq!(checked_domain_size(21), 1 << 21);
	}
}
