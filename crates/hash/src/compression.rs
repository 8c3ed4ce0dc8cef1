// Copyright 2024-2025 Irreducible Inc.

use crate::{
	error::Error,
	primitives::{big_sigma0, big_sigma1, ch_left, ch_right, maj, small_sigma0, small_sigma1},
};

/// The 8-word running state (a..h) carried between chunks.
pub type ChainingState = [u32; 8];

/// A 512-bit message chunk as big-endian words.
pub type Chunk = [u32; 16];

/// Number of message-schedule expansion rounds (words 16..64).
pub const SCHEDULE_ROUNDS: usize = 48;

/// Number of compression rounds.
pub const COMPRESSION_ROUNDS: usize = 64;

/// Longest message that still fits in one padded block.
pub const MAX_SINGLE_BLOCK_MESSAGE_LEN: usize = 55;

/// SHA-256 round constants, K
pub const ROUND_CONSTS_K: [u32; 64] = [
	0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
	0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
	0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
	0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
	0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
	0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
	0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
	0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

/// SHA-256 initial chaining state.
pub const INIT: ChainingState = [
	0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

/// A function folding one message chunk into a chaining state.
pub trait ChunkCompression {
	fn compress(&self, state: &mut ChainingState, chunk: &Chunk);
}

/// The FIPS 180-4 compression function, parametrized by its round constants.
#[derive(Debug, Clone)]
pub struct ReferenceCompressor {
	round_constants: [u32; 64],
}

impl Default for ReferenceCompressor {
	fn default() -> Self {
		Self {
			round_constants: ROUND_CONSTS_K,
		}
	}
}

impl ReferenceCompressor {
	/// A compressor using caller-supplied round constants. All-zero constants give the unkeyed
	/// round function.
	pub fn with_round_constants(round_constants: [u32; 64]) -> Self {
		Self { round_constants }
	}

	pub fn round_constants(&self) -> &[u32; 64] {
		&self.round_constants
	}
}

impl ChunkCompression for ReferenceCompressor {
	fn compress(&self, state: &mut ChainingState, chunk: &Chunk) {
		let w = message_schedule(chunk);

		let mut working = *state;
		for (&k, &w) in self.round_constants.iter().zip(w.iter()) {
			round(&mut working, k, w);
		}

		for (word, round) in state.iter_mut().zip(working) {
			*word = word.wrapping_add(round);
		}
	}
}

/// One compression round on the working variables `a..h`, with round constant `k` and schedule
/// word `w`.
pub fn round(working: &mut ChainingState, k: u32, w: u32) {
	let [a, b, c, d, e, f, g, h] = *working;

	let temp1 = h
		.wrapping_add(big_sigma1(e))
		.wrapping_add(ch_left(e, f))
		.wrapping_add(ch_right(e, g))
		.wrapping_add(k)
		.wrapping_add(w);
	let temp2 = big_sigma0(a).wrapping_add(maj(a, b, c));

	*working = [temp1.wrapping_add(temp2), a, b, c, d.wrapping_add(temp1), e, f, g];
}

/// Expands a chunk into the 64 schedule words.
pub fn message_schedule(chunk: &Chunk) -> [u32; 64] {
	let mut w = [0u32; 64];
	w[..16].copy_from_slice(chunk);

	for t in 16..64 {
		w[t] = w[t - 16]
			.wrapping_add(small_sigma0(w[t - 15]))
			.wrapping_add(w[t - 7])
			.wrapping_add(small_sigma1(w[t - 2]));
	}

	w
}

/// Compresses one chunk into `state` with the standard round constants.
pub fn compress(state: &mut ChainingState, chunk: &Chunk) {
	ReferenceCompressor::default().compress(state, chunk)
}

/// Compresses one chunk into `state` with caller-supplied round constants.
pub fn compress_with_round_constants(
	state: &mut ChainingState,
	chunk: &Chunk,
	round_constants: [u32; 64],
) {
	ReferenceCompressor::with_round_constants(round_constants).compress(state, chunk)
}

/// Pads a short message into a single chunk: the message bytes, a `0x80` marker, zeros and
/// the 64-bit big-endian bit length.
pub fn pad_single_block(message: &[u8]) -> Result<Chunk, Error> {
	if message.len() > MAX_SINGLE_BLOCK_MESSAGE_LEN {
		return Err(Error::MessageTooLong {
			len: message.len(),
			max: MAX_SINGLE_BLOCK_MESSAGE_LEN,
		});
	}

	let mut block = [0u8; 64];
	block[..message.len()].copy_from_slice(message);
	block[message.len()] = 0x80;
	block[56..].copy_from_slice(&((message.len() as u64) * 8).to_be_bytes());

	let mut chunk = [0u32; 16];
	for (word, bytes) in chunk.iter_mut().zip(block.chunks_exact(4)) {
		*word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
	}
	Ok(chunk)
}

/// Serializes a chaining state as the big-endian digest bytes.
pub fn digest_bytes(state: &ChainingState) -> [u8; 32] {
	let mut out = [0u8; 32];
	for (bytes, word) in out.chunks_exact_mut(4).zip(state) {
		bytes.copy_from_slice(&word.to_be_bytes());
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_pad_empty_message() {
		let chunk = pad_single_block(b"").unwrap();
		assert_eq!(chunk[0], 0x8000_0000);
		assert!(chunk[1..].iter().all(|&w| w == 0));
	}

	#[test]
	fn test_pad_abc() {
		let chunk = pad_single_block(b"abc").unwrap();
		assert_eq!(chunk[0], 0x6162_6380);
		assert_eq!(chunk[15], 24);
		assert!(chunk[1..15].iter().all(|&w| w == 0));
	}

	#[test]
	fn test_pad_too_long() {
		assert!(pad_single_block(&[0u8; MAX_SINGLE_BLOCK_MESSAGE_LEN]).is_ok());
		let err = pad_single_block(&[0u8; 56]).unwrap_err();
		assert!(matches!(err, Error::MessageTooLong { len: 56, max: 55 }));
	}

	#[test]
	fn test_round_shifts_working_variables() {
		let mut working = INIT;
		round(&mut working, 0, 0);
		assert_eq!(&working[1..4], &INIT[..3]);
		assert_eq!(&working[5..], &INIT[4..7]);

		let temp1 = INIT[7]
			.wrapping_add(big_sigma1(INIT[4]))
			.wrapping_add(crate::primitives::ch(INIT[4], INIT[5], INIT[6]));
		assert_eq!(working[4], INIT[3].wrapping_add(temp1));
		assert_eq!(
			working[0],
			temp1
				.wrapping_add(big_sigma0(INIT[0]))
				.wrapping_add(maj(INIT[0], INIT[1], INIT[2]))
		);
	}

	#[test]
	fn test_schedule_keeps_chunk() {
		let chunk: Chunk = std::array::from_fn(|i| i as u32 * 0x0101_0101);
		let w = message_schedule(&chunk);
		assert_eq!(&w[..16], &chunk);
		assert_eq!(
			w[16],
			chunk[0]
				.wrapping_add(small_sigma0(chunk[1]))
				.wrapping_add(chunk[9])
				.wrapping_add(small_sigma1(chunk[14]))
		);
	}

	#[test]
	fn test_compress_abc() {
		let mut state = INIT;
		compress(&mut state, &pad_single_block(b"abc").unwrap());
		assert_eq!(
			state,
			[
				0xba7816bf, 0x8f01cfea, 0x414140de, 0x5dae2223, 0xb00361a3, 0x96177a9c, 0xb410ff61,
				0xf20015ad,
			]
		);
	}

	#[test]
	fn test_round_constants_matter() {
		let chunk = pad_single_block(b"abc").unwrap();
		let mut keyed = INIT;
		let mut unkeyed = INIT;
		ReferenceCompressor::default().compress(&mut keyed, &chunk);
		compress_with_round_constants(&mut unkeyed, &chunk, [0; 64]);
		assert_ne!(keyed, unkeyed);
	}
}
