//! FNV-1a hashing, 32-bit variant.
//!
//! Exposed through the standard `Hasher`/`BuildHasher` seam so the table
//! can default to it while tests substitute degenerate hashers to force
//! collisions.

use core::hash::{BuildHasher, Hasher};

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// 32-bit FNV-1a state. Each input byte is xor-ed in and the state is
/// multiplied by the FNV prime; `finish` widens the result to `u64`.
#[derive(Copy, Clone, Debug)]
pub struct Fnv1a32 {
    hash: u32,
}

impl Default for Fnv1a32 {
    fn default() -> Self {
        Self {
            hash: FNV_OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1a32 {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.hash ^= u32::from(b);
            self.hash = self.hash.wrapping_mul(FNV_PRIME);
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        u64::from(self.hash)
    }
}

/// `BuildHasher` for [`Fnv1a32`]; the table's default hasher.
#[derive(Copy, Clone, Debug, Default)]
pub struct BuildFnv1a32;

impl BuildHasher for BuildFnv1a32 {
    type Hasher = Fnv1a32;

    fn build_hasher(&self) -> Self::Hasher {
        Fnv1a32::default()
    }
}
