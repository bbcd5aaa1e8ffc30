//! Frozen bit vector with a popcount prefix index
//!
//! `prefix[w]` holds the number of set bits in words `[0, w)`, so rank is one
//! lookup plus one masked popcount. Select binary-searches the prefix table
//! and then walks a single word.

use super::bits::BitVector;

/// Immutable bits with O(1) rank and O(log n) select.
///
/// Positions are row indices, so the whole API speaks `u32`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedBits {
    bits: BitVector,
    prefix: Vec<u32>,
}

impl RankedBits {
    /// Freezes `bits` and builds the rank index.
    pub fn new(bits: BitVector) -> Self {
        assert!(
            bits.len() <= u32::MAX as usize,
            "bit vector of {} bits exceeds the row index space",
            bits.len()
        );
        let mut prefix = Vec::with_capacity(bits.as_words().len() + 1);
        let mut running = 0u32;
        prefix.push(0);
        for word in bits.as_words() {
            running += word.count_ones();
            prefix.push(running);
        }
        Self { bits, prefix }
    }

    /// Number of bits, set or not.
    pub fn len(&self) -> u32 {
        self.bits.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of set bits. Equal to `rank(len())`.
    pub fn count_ones(&self) -> u32 {
        self.bits.count_ones() as u32
    }

    pub fn get(&self, index: u32) -> bool {
        self.bits.get(index as usize)
    }

    pub fn bits(&self) -> &BitVector {
        &self.bits
    }

    /// Number of set bits strictly before `index`. `index` may equal `len()`.
    pub fn rank(&self, index: u32) -> u32 {
        debug_assert!(index <= self.len(), "rank index out of bounds");
        let word = index as usize / 64;
        let bit = index % 64;
        let base = self.prefix[word];
        if bit == 0 {
            return base;
        }
        let mask = (1u64 << bit) - 1;
        base + (self.bits.as_words()[word] & mask).count_ones()
    }

    /// Position of the `k`-th set bit (0-based).
    pub fn select(&self, k: u32) -> u32 {
        assert!(
            k < self.count_ones(),
            "select({}) with only {} set bits",
            k,
            self.count_ones()
        );
        // Last word whose prefix count is <= k holds the answer.
        let word = self.prefix.partition_point(|&p| p <= k) - 1;
        let mut remaining = k - self.prefix[word];
        let mut w = self.bits.as_words()[word];
        while remaining > 0 {
            w &= w - 1;
            remaining -= 1;
        }
        (word as u32) * 64 + w.trailing_zeros()
    }

    /// Iterates set bit positions `>= start` in ascending order.
    pub fn ones_from(&self, start: u32) -> OnesFrom<'_> {
        let words = self.bits.as_words();
        let word_idx = start as usize / 64;
        let current = match words.get(word_idx) {
            Some(w) => w & (u64::MAX << (start % 64)),
            None => 0,
        };
        OnesFrom {
            words,
            word_idx,
            current,
        }
    }
}

impl From<BitVector> for RankedBits {
    fn from(bits: BitVector) -> Self {
        Self::new(bits)
    }
}

/// Iterator over set bit positions, see [`RankedBits::ones_from`].
pub struct OnesFrom<'a> {
    words: &'a [u64],
    word_idx: usize,
    current: u64,
}

impl Iterator for OnesFrom<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            if self.current != 0 {
                let tz = self.current.trailing_zeros();
                self.current &= self.current - 1;
                return Some(self.word_idx as u32 * 64 + tz);
            }
            self.word_idx += 1;
            self.current = *self.words.get(self.word_idx)?;
        }
    }
}
