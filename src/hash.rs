//! Functions for combining a program counter value with some history into an
//! index or a tag.
//!
//! Parameterized variants take their widths as const generics, so a specific
//! instantiation (ie. `f_folded_xor::<9, 64, 20>`) coerces into a [HashFn]
//! and can be stored in a predictor configuration.

use bitvec::prelude::*;

/// A function used to combine (a) a program counter value, and (b) some
/// history value into a single value.
pub type HashFn = fn(usize, usize) -> usize;

/// Keep only the low `bits` bits of some value.
pub fn truncate(val: usize, bits: usize) -> usize {
    if bits >= usize::BITS as usize {
        val
    } else {
        val & ((1 << bits) - 1)
    }
}

/// XOR both operands together (as in "gshare").
pub fn f_xor(a: usize, b: usize) -> usize {
    a ^ b
}

/// Concatenate the low `A` bits of `a` with the low `B` bits of `b`.
/// The bits from `a` are placed above the bits from `b`.
pub fn f_concat<const A: usize, const B: usize>(a: usize, b: usize) -> usize {
    let hi = truncate(a, A);
    let lo = truncate(b, B);
    if B >= usize::BITS as usize { lo } else { (hi << B) | lo }
}

/// Use only the first operand.
pub fn f_a(a: usize, _b: usize) -> usize {
    a
}

/// Use only the second operand.
pub fn f_b(_a: usize, b: usize) -> usize {
    b
}

/// Fold [with XOR] the low `A` bits of `a` and the low `B` bits of `b` into
/// `L` bits.
pub fn f_folded_xor<const L: usize, const A: usize, const B: usize>(
    a: usize, b: usize
) -> usize
{
    fold(a, A, L) ^ fold(b, B, L)
}

/// Fold [with XOR] the low `bits` bits of `val` into chunks of `output_bits`.
/// A trailing partial chunk is included.
pub fn fold(val: usize, bits: usize, output_bits: usize) -> usize {
    let len = bits.min(usize::BITS as usize);
    if len == 0 || output_bits == 0 {
        return 0;
    }
    let slice = &val.view_bits::<Lsb0>()[..len];
    slice.chunks(output_bits).fold(0, |res, x| res ^ x.load_le::<usize>())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn truncate_masks_low_bits() {
        assert_eq!(truncate(0xabcd, 8), 0xcd);
        assert_eq!(truncate(0xabcd, 0), 0);
        assert_eq!(truncate(usize::MAX, 64), usize::MAX);
    }

    #[test]
    fn concat_places_a_above_b() {
        assert_eq!(f_concat::<4, 4>(0x1f, 0x2a), 0xfa);
        assert_eq!(f_concat::<2, 6>(0b111, 0b10_1010), 0b11_101010);
    }

    #[test]
    fn projections() {
        assert_eq!(f_a(3, 5), 3);
        assert_eq!(f_b(3, 5), 5);
        assert_eq!(f_xor(0b1100, 0b1010), 0b0110);
    }

    #[test]
    fn folded_xor_combines_all_chunks() {
        // 0xa ^ 0xb ^ 0x3
        assert_eq!(f_folded_xor::<4, 8, 4>(0xab, 0x3), 0x2);

        // Bits above the operand widths are ignored
        assert_eq!(f_folded_xor::<4, 8, 4>(0xfab, 0xf3), 0x2);

        // A partial chunk still contributes
        assert_eq!(f_folded_xor::<4, 6, 0>(0b11_0001, 0), 0b0010);
    }

    #[test]
    fn folded_xor_output_fits_width() {
        for a in (0..4096usize).step_by(37) {
            let v = f_folded_xor::<9, 64, 40>(a.wrapping_mul(0x9e37_79b9), a);
            assert!(v < (1 << 9));
        }
    }
}
