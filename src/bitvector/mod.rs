//! Bit vectors used by the presence and selection transforms
//!
//! Two types:
//! - `BitVector`: growable, mutable, used while a column layout is assembled
//! - `RankedBits`: frozen bits plus a per-word popcount prefix index
//!
//! # Invariants
//!
//! - Bits beyond `len` in the last word are always zero
//! - `RankedBits::rank` is O(1), `RankedBits::select` is O(log words)

mod bits;
mod ranked;

pub use bits::BitVector;
pub use ranked::{OnesFrom, RankedBits};
