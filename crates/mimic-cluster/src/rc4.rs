//! Deterministic RC4 keystream generator for reproducible sampling.
//!
//! Not cryptographic. Used to pick initial k-means centroids so that the
//! same seed always yields the same clustering.

use rand::RngCore;

/// Seed for [`Rc4Random`]: text (converted to its UTF-8 bytes) or raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedInput {
    /// A text key.
    ByString(String),
    /// A raw byte key.
    ByBytes(Vec<u8>),
}

impl SeedInput {
    /// Return the key bytes fed to the key schedule.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::ByString(s) => s.as_bytes(),
            Self::ByBytes(b) => b,
        }
    }
}

impl From<&str> for SeedInput {
    fn from(s: &str) -> Self {
        Self::ByString(s.to_owned())
    }
}

impl From<String> for SeedInput {
    fn from(s: String) -> Self {
        Self::ByString(s)
    }
}

impl From<Vec<u8>> for SeedInput {
    fn from(b: Vec<u8>) -> Self {
        Self::ByBytes(b)
    }
}

impl From<&[u8]> for SeedInput {
    fn from(b: &[u8]) -> Self {
        Self::ByBytes(b.to_vec())
    }
}

/// RC4 keystream generator: a 256-entry permutation plus two indices.
#[derive(Clone)]
pub struct Rc4Random {
    s: [u8; 256],
    i: u8,
    j: u8,
}

impl std::fmt::Debug for Rc4Random {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rc4Random")
            .field("i", &self.i)
            .field("j", &self.j)
            .finish_non_exhaustive()
    }
}

impl Rc4Random {
    /// Create a generator by running the RC4 key schedule over `seed`.
    ///
    /// An empty key leaves the identity permutation in place.
    #[must_use]
    pub fn new(seed: &SeedInput) -> Self {
        Self::from_key(seed.as_bytes())
    }

    /// Create a generator directly from key bytes.
    #[must_use]
    pub fn from_key(key: &[u8]) -> Self {
        let mut s = [0u8; 256];
        for (slot, v) in s.iter_mut().zip(0..=255u8) {
            *slot = v;
        }
        if !key.is_empty() {
            let mut j = 0u8;
            for i in 0..256 {
                j = j.wrapping_add(s[i]).wrapping_add(key[i % key.len()]);
                s.swap(i, j as usize);
            }
        }
        Self { s, i: 0, j: 0 }
    }

    /// Return the next keystream byte.
    pub fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.s[self.i as usize]);
        self.s.swap(self.i as usize, self.j as usize);
        let k = self.s[self.i as usize].wrapping_add(self.s[self.j as usize]);
        self.s[k as usize]
    }

    /// Six keystream bytes composed big-endian into a 48-bit integer.
    fn next_u48(&mut self) -> u64 {
        (0..6).fold(0u64, |acc, _| (acc << 8) | u64::from(self.next_byte()))
    }

    /// Uniform draw in `[0, 1)` with 48 bits of resolution.
    pub fn uniform(&mut self) -> f64 {
        self.next_u48() as f64 / (1u64 << 48) as f64
    }

    /// Integer in `[min, max]`, computed as a 48-bit draw modulo the range size.
    ///
    /// Slightly biased toward small offsets when the range size does not
    /// divide 2^48. Requires `min <= max`.
    pub fn randint(&mut self, min: u64, max: u64) -> u64 {
        debug_assert!(min <= max, "randint requires min <= max");
        let raw = self.next_u48();
        match (max - min).checked_add(1) {
            Some(span) => raw % span + min,
            None => raw + min,
        }
    }

    /// Pick `k` distinct indices from `0..n` with reservoir sampling (Algorithm R).
    ///
    /// The result is in sampling order, not sorted. `k` is clamped to `n`.
    pub fn choose_indices(&mut self, n: usize, k: usize) -> Vec<usize> {
        let k = k.min(n);
        let mut chosen: Vec<usize> = (0..k).collect();
        for i in k..n {
            let j = self.randint(0, i as u64) as usize;
            if j < k {
                chosen[j] = i;
            }
        }
        chosen
    }
}

impl RngCore for Rc4Random {
    fn next_u32(&mut self) -> u32 {
        (0..4).fold(0u32, |acc, _| (acc << 8) | u32::from(self.next_byte()))
    }

    fn next_u64(&mut self) -> u64 {
        (0..8).fold(0u64, |acc, _| (acc << 8) | u64::from(self.next_byte()))
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for b in dest {
            *b = self.next_byte();
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;

    use super::*;

    fn keystream(key: &str, n: usize) -> Vec<u8> {
        let mut rng = Rc4Random::new(&SeedInput::from(key));
        (0..n).map(|_| rng.next_byte()).collect()
    }

    #[test]
    fn standard_test_vectors() {
        assert_eq!(
            keystream("Key", 8),
            [0xeb, 0x9f, 0x77, 0x81, 0xb7, 0x34, 0xca, 0x72]
        );
        assert_eq!(
            keystream("Wiki", 8),
            [0x60, 0x44, 0xdb, 0x6d, 0x41, 0xb7, 0xe8, 0xe7]
        );
        assert_eq!(
            keystream("Secret", 8),
            [0x04, 0xd4, 0x6b, 0x05, 0x3c, 0xa8, 0x7b, 0x59]
        );
    }

    #[test]
    fn string_and_byte_seeds_agree() {
        let mut a = Rc4Random::new(&SeedInput::ByString("Labeling".into()));
        let mut b = Rc4Random::new(&SeedInput::ByBytes(b"Labeling".to_vec()));
        for _ in 0..64 {
            assert_eq!(a.next_byte(), b.next_byte());
        }
    }

    #[test]
    fn uniform_composes_six_bytes() {
        let mut rng = Rc4Random::new(&"Labeling".into());
        let first = rng.uniform();
        let second = rng.uniform();
        assert!((first - 0.5492219081171115).abs() < 1e-15);
        assert!((second - 0.20765939674448575).abs() < 1e-15);
    }

    #[test]
    fn randint_stays_in_range() {
        let mut rng = Rc4Random::new(&"Labeling".into());
        let draws: Vec<u64> = (0..5).map(|_| rng.randint(0, 9)).collect();
        assert_eq!(draws, vec![6, 3, 2, 2, 3]);

        for _ in 0..200 {
            let v = rng.randint(3, 7);
            assert!((3..=7).contains(&v));
        }
    }

    #[test]
    fn choose_indices_is_deterministic() {
        let mut a = Rc4Random::new(&"Labeling".into());
        let mut b = Rc4Random::new(&"Labeling".into());
        assert_eq!(a.choose_indices(10, 3), b.choose_indices(10, 3));
    }

    #[test]
    fn choose_indices_golden() {
        assert_eq!(Rc4Random::new(&"Labeling".into()).choose_indices(10, 3), vec![0, 1, 6]);
        assert_eq!(Rc4Random::new(&"Labeling".into()).choose_indices(5, 2), vec![0, 2]);
        assert_eq!(Rc4Random::new(&"Other".into()).choose_indices(10, 3), vec![0, 4, 6]);
        assert_eq!(
            Rc4Random::new(&SeedInput::ByBytes(vec![1, 2, 3])).choose_indices(10, 3),
            vec![7, 3, 2]
        );
    }

    #[test]
    fn choose_indices_distinct_and_clamped() {
        let mut rng = Rc4Random::new(&"Labeling".into());
        let mut picked = rng.choose_indices(50, 10);
        picked.sort_unstable();
        picked.dedup();
        assert_eq!(picked.len(), 10);
        assert!(picked.iter().all(|&i| i < 50));

        assert_eq!(rng.choose_indices(3, 5), vec![0, 1, 2]);
    }

    #[test]
    fn empty_seed_skips_key_schedule() {
        let mut empty = Rc4Random::from_key(&[]);
        let mut also_empty = Rc4Random::new(&SeedInput::ByString(String::new()));
        let a: Vec<u8> = (0..16).map(|_| empty.next_byte()).collect();
        let b: Vec<u8> = (0..16).map(|_| also_empty.next_byte()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn usable_as_rand_rng() {
        let mut a = Rc4Random::new(&"Labeling".into());
        let mut b = Rc4Random::new(&"Labeling".into());
        let xs: Vec<u32> = (0..8).map(|_| a.gen_range(0..100)).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.gen_range(0..100)).collect();
        assert_eq!(xs, ys);
    }
}
