// Copyright 2024-2025 Irreducible Inc.

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid rotation parameters {params:?}: not a SHA-256 sigma parameter set")]
	InvalidParameters { params: [u32; 3] },
	#[error("message of {len} bytes does not fit in a single padded block (max {max})")]
	MessageTooLong { len: usize, max: usize },
}
