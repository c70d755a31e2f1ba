// Copyright 2023-2026 Andrew Conway.
// This file is part of ConcreteSTV.
// ConcreteSTV is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// ConcreteSTV is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with ConcreteSTV.  If not, see <https://www.gnu.org/licenses/>.


//! Pseudo-random numbers that anyone can reproduce.
//!
//! The stream is ChaCha20 with a 32 byte seed made of the little endian u64 seed followed by
//! 24 zero bytes. Numbers in a range are made by rejection sampling on whole 64 bit words,
//! so the output does not depend on the version of any sampling code.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// A deterministic random stream for drawing precedence orders.
#[derive(Clone,Debug)]
pub struct AuditableRng {
    rng : ChaCha20Rng,
    words_consumed : u64,
}

impl AuditableRng {
    pub fn from_seed_u64(seed:u64) -> Self {
        let mut seed32 = [0u8;32];
        seed32[..8].copy_from_slice(&seed.to_le_bytes());
        AuditableRng{ rng: ChaCha20Rng::from_seed(seed32), words_consumed: 0 }
    }

    /// Number of 64 bit words drawn so far, including rejected ones.
    pub fn words_consumed(&self) -> u64 { self.words_consumed }

    fn next_u64(&mut self) -> u64 {
        self.words_consumed+=1;
        self.rng.next_u64()
    }

    /// Uniform integer in 0..n. An n of 0 is treated as 1.
    ///
    /// Accepts a word x iff x >= 2^64 mod n, after which x mod n is unbiased.
    /// ```
    /// use votecount::random_util::AuditableRng;
    /// let mut a = AuditableRng::from_seed_u64(42);
    /// let mut b = AuditableRng::from_seed_u64(42);
    /// let from_a : Vec<u64> = (0..20).map(|_|a.below(1_000_000)).collect();
    /// let from_b : Vec<u64> = (0..20).map(|_|b.below(1_000_000)).collect();
    /// assert_eq!(from_a,from_b);
    /// assert!(from_a.iter().all(|&v|v<1_000_000));
    /// ```
    pub fn below(&mut self,n:u64) -> u64 {
        let n = n.max(1);
        let threshold = n.wrapping_neg()%n;
        loop {
            let x = self.next_u64();
            if x>=threshold { return x%n; }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn different_seeds_give_different_streams() {
        let mut a = AuditableRng::from_seed_u64(100);
        let mut b = AuditableRng::from_seed_u64(101);
        let from_a : Vec<u64> = (0..8).map(|_|a.below(1_000_000)).collect();
        let from_b : Vec<u64> = (0..8).map(|_|b.below(1_000_000)).collect();
        assert_ne!(from_a,from_b);
    }

    #[test]
    fn degenerate_range() {
        let mut rng = AuditableRng::from_seed_u64(7);
        assert_eq!(rng.below(0),0);
        assert_eq!(rng.below(1),0);
        assert_eq!(rng.words_consumed(),2);
    }
}
