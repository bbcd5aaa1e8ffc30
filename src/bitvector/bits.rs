//! Growable bit vector
//!
//! Bits are stored little-endian within each `u64` word:
//! bit 0 is the LSB of word 0, bit 63 is the MSB of word 0.

/// A compact, growable bit vector.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitVector {
    words: Vec<u64>,
    len: usize,
    ones: usize,
}

impl BitVector {
    /// Creates an empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a vector of `bits` bits, all set to `value`.
    pub fn with_len(bits: usize, value: bool) -> Self {
        if bits == 0 {
            return Self::new();
        }
        let word_len = (bits + 63) / 64;
        if !value {
            return Self {
                words: vec![0u64; word_len],
                len: bits,
                ones: 0,
            };
        }

        let mut words = vec![u64::MAX; word_len];
        let rem = bits % 64;
        if rem != 0 {
            if let Some(last) = words.last_mut() {
                *last = (1u64 << rem) - 1;
            }
        }
        Self {
            words,
            len: bits,
            ones: bits,
        }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, value: bool) {
        let bit = self.len % 64;
        if bit == 0 {
            self.words.push(0);
        }
        if value {
            self.words[self.len / 64] |= 1u64 << bit;
            self.ones += 1;
        }
        self.len += 1;
    }

    /// Panics if `index >= len()`.
    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.len, "BitVector index {} out of bounds ({})", index, self.len);
        (self.words[index / 64] >> (index % 64)) & 1 == 1
    }

    pub fn set(&mut self, index: usize, value: bool) {
        assert!(index < self.len, "BitVector index {} out of bounds ({})", index, self.len);
        let word = &mut self.words[index / 64];
        let mask = 1u64 << (index % 64);
        let was_set = *word & mask != 0;
        match (was_set, value) {
            (true, false) => {
                *word &= !mask;
                self.ones -= 1;
            }
            (false, true) => {
                *word |= mask;
                self.ones += 1;
            }
            _ => {}
        }
    }

    /// Number of set bits (popcount).
    pub fn count_ones(&self) -> usize {
        self.ones
    }

    pub fn as_words(&self) -> &[u64] {
        &self.words
    }

    /// Iterates over every bit in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }
}

impl From<&[bool]> for BitVector {
    fn from(bits: &[bool]) -> Self {
        bits.iter().copied().collect()
    }
}

impl<const N: usize> From<[u8; N]> for BitVector {
    /// Builds from a 0/1 literal, handy for hand-written layouts.
    fn from(bits: [u8; N]) -> Self {
        bits.iter().map(|b| *b != 0).collect()
    }
}

impl FromIterator<bool> for BitVector {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut bv = BitVector {
            words: Vec::with_capacity((iter.size_hint().0 + 63) / 64),
            len: 0,
            ones: 0,
        };
        for bit in iter {
            bv.push(bit);
        }
        bv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_get() {
        let mut bv = BitVector::new();
        for i in 0..130 {
            bv.push(i % 3 == 0);
        }
        assert_eq!(bv.len(), 130);
        assert_eq!(bv.count_ones(), 44);
        assert!(bv.get(0));
        assert!(!bv.get(1));
        assert!(bv.get(129));
    }

    #[test]
    fn test_with_len_masks_tail() {
        let bv = BitVector::with_len(70, true);
        assert_eq!(bv.count_ones(), 70);
        assert_eq!(bv.as_words()[1], (1u64 << 6) - 1);

        let empty = BitVector::with_len(70, false);
        assert_eq!(empty.count_ones(), 0);
    }

    #[test]
    fn test_set_tracks_ones() {
        let mut bv = BitVector::with_len(10, false);
        bv.set(3, true);
        bv.set(3, true);
        bv.set(7, true);
        assert_eq!(bv.count_ones(), 2);
        bv.set(3, false);
        assert_eq!(bv.count_ones(), 1);
        assert!(!bv.get(3));
    }

    #[test]
    fn test_from_literal() {
        let bv = BitVector::from([1u8, 1, 0, 0, 1]);
        assert_eq!(bv.iter().collect::<Vec<_>>(), vec![true, true, false, false, true]);
    }

    #[test]
    #[should_panic]
    fn test_get_out_of_bounds_panics() {
        BitVector::with_len(4, true).get(4);
    }
}
