
use bitvec::prelude::*;

use crate::Outcome;

/// A register recording the last 'n' branch outcomes.
///
/// The most-recent outcome is held in bit 0. Shifting in a new outcome
/// discards the oldest one (bit 'n-1').
#[derive(Clone, Debug)]
pub struct ShiftRegister {
    data: BitVec<usize, Lsb0>,
    len: usize,
}

// NOTE: This *reverses* the all of the bits and presents them in a format
// where the leftmost bit is the most-significant (index n) and the rightmost
// bit is the least-significant (index 0).
impl std::fmt::Display for ShiftRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let x: String = self.data.as_bitslice().iter().by_vals()
            .map(|b| if b { '1' } else { '0' })
            .rev()
            .collect();
        write!(f, "{}", x)
    }
}

impl ShiftRegister {
    /// The widest register whose value still fits in a [usize].
    pub const MAX_LEN: usize = usize::BITS as usize - 1;

    /// Create a register with the specified length in bits.
    /// All bits in the register are initialized to zero.
    pub fn new(len: usize) -> Self {
        assert!(len > 0 && len <= Self::MAX_LEN,
            "shift register length {} out of range", len);
        Self {
            data: bitvec![usize, Lsb0; 0; len],
            len,
        }
    }

    pub fn len(&self) -> usize { self.len }

    /// Number of bits of storage.
    pub fn storage_bits(&self) -> usize { self.len }

    /// Return the raw value of the register.
    pub fn val(&self) -> usize { self.data.load_le::<usize>() }

    /// Shift a new outcome into bit 0 and return the bit that was pushed out
    /// of the top of the register.
    pub fn shift_in(&mut self, outcome: Outcome) -> bool {
        let evicted = self.data[self.len - 1];
        self.data.shift_end(1);
        self.data.set(0, outcome.into());
        evicted
    }

    /// Clear all bits.
    pub fn clear(&mut self) {
        self.data.fill(false);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Outcome::*;

    #[test]
    fn shift_in_places_newest_in_bit0() {
        let mut r = ShiftRegister::new(4);
        for o in [T, N, T, T] {
            r.shift_in(o);
        }
        // First outcome ends up in the most-significant retained bit
        assert_eq!(r.val(), 0b1011);
        assert_eq!(format!("{}", r), "1011");
    }

    #[test]
    fn value_is_bounded() {
        let mut r = ShiftRegister::new(3);
        for _ in 0..10 {
            r.shift_in(T);
            assert!(r.val() < (1 << 3));
        }
        assert_eq!(r.val(), 0b111);
    }

    #[test]
    fn evicted_bits_come_out_in_order() {
        let pattern = [T, N, N, T, T];
        let mut r = ShiftRegister::new(pattern.len());
        for o in pattern {
            assert!(!r.shift_in(o));
        }
        let evicted: Vec<Outcome> = (0..pattern.len())
            .map(|_| r.shift_in(N).into())
            .collect();
        assert_eq!(evicted, pattern);
        assert_eq!(r.val(), 0);
    }

    #[test]
    fn clear_resets_value() {
        let mut r = ShiftRegister::new(8);
        r.shift_in(T);
        r.clear();
        assert_eq!(r.val(), 0);
    }
}
