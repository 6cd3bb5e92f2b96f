// SPDX-FileCopyrightText: 2026 Robotelem Contributors
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Difference encoding for quantized sequences.
//!
//! Particles in a filter cloud sit near each other, so consecutive quantized
//! values differ by small amounts; storing differences instead of absolute
//! values keeps the varints short. The first element is always left alone.
//!
//! Two modes:
//! - signed: `d[i] = q[i] - q[i-1]`, may go negative, no wraparound.
//! - wrapping: inputs lie in `[0, modulus)` and a negative difference is
//!   represented as `(modulus + q[i]) - q[i-1]`, keeping every delta in
//!   `[0, modulus)`. The decoder undoes this with a modular cumulative sum.
//!   Whether legitimate consecutive differences can alias under the modulus
//!   is the caller's concern; this component does not validate it.

/// In-place signed delta encoding. `values[0]` is untouched.
pub fn delta_encode_signed(values: &mut [i64]) {
    let mut last = match values.first() {
        Some(&v) => v,
        None => return,
    };
    for v in values.iter_mut().skip(1) {
        let current = *v;
        *v = current - last;
        last = current;
    }
}

/// Inverse of [`delta_encode_signed`]: cumulative sum in place.
pub fn delta_decode_signed(deltas: &mut [i64]) {
    let mut acc = match deltas.first() {
        Some(&v) => v,
        None => return,
    };
    for d in deltas.iter_mut().skip(1) {
        acc += *d;
        *d = acc;
    }
}

/// In-place modular delta encoding over `[0, modulus)`. `values[0]` is
/// untouched; every other element becomes a delta in `[0, modulus)`.
pub fn delta_encode_wrapping(values: &mut [i64], modulus: u32) {
    let modulus = i64::from(modulus);
    let mut last = match values.first() {
        Some(&v) => v,
        None => return,
    };
    for v in values.iter_mut().skip(1) {
        let current = *v;
        debug_assert!((0..modulus).contains(&current));
        *v = if current >= last {
            current - last
        } else {
            (modulus + current) - last
        };
        last = current;
    }
}

/// Inverse of [`delta_encode_wrapping`]: cumulative sum mod `modulus`.
pub fn delta_decode_wrapping(deltas: &mut [i64], modulus: u32) {
    let modulus = i64::from(modulus);
    let mut acc = match deltas.first() {
        Some(&v) => v,
        None => return,
    };
    for d in deltas.iter_mut().skip(1) {
        acc = (acc + *d) % modulus;
        *d = acc;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_basic() {
        let mut values = vec![10, 12, 11, 11, 8];
        delta_encode_signed(&mut values);
        assert_eq!(values, vec![10, 2, -1, 0, -3]);
    }

    #[test]
    fn test_signed_round_trip() {
        let original = vec![-5i64, 3, 3, 100, -200, 0];
        let mut values = original.clone();
        delta_encode_signed(&mut values);
        delta_decode_signed(&mut values);
        assert_eq!(values, original);
    }

    #[test]
    fn test_single_element_untouched() {
        let mut values = vec![42i64];
        delta_encode_signed(&mut values);
        assert_eq!(values, vec![42]);
        let mut values = vec![42i64];
        delta_encode_wrapping(&mut values, 64);
        assert_eq!(values, vec![42]);
    }

    #[test]
    fn test_empty_sequence() {
        let mut values: Vec<i64> = vec![];
        delta_encode_signed(&mut values);
        delta_encode_wrapping(&mut values, 64);
        assert!(values.is_empty());
    }

    #[test]
    fn test_wrapping_no_wrap_needed() {
        let mut values = vec![3i64, 5, 9];
        delta_encode_wrapping(&mut values, 64);
        assert_eq!(values, vec![3, 2, 4]);
    }

    #[test]
    fn test_wrapping_boundary() {
        // q = [M-1, 0] must produce delta[1] = (M + 0) - (M - 1) = 1
        let mut values = vec![63i64, 0];
        delta_encode_wrapping(&mut values, 64);
        assert_eq!(values, vec![63, 1]);
    }

    #[test]
    fn test_wrapping_deltas_stay_in_range() {
        let mut values = vec![0i64, 63, 1, 62, 31];
        delta_encode_wrapping(&mut values, 64);
        for &d in &values {
            assert!((0..64).contains(&d), "delta {d} escaped [0, 64)");
        }
    }

    #[test]
    fn test_wrapping_round_trip() {
        let original = vec![0i64, 63, 1, 62, 31, 31, 32];
        let mut values = original.clone();
        delta_encode_wrapping(&mut values, 64);
        delta_decode_wrapping(&mut values, 64);
        assert_eq!(values, original);
    }

    #[test]
    fn test_wrapping_round_trip_large_modulus() {
        let original = vec![65535i64, 0, 32768, 32767, 1];
        let mut values = original.clone();
        delta_encode_wrapping(&mut values, 1 << 16);
        delta_decode_wrapping(&mut values, 1 << 16);
        assert_eq!(values, original);
    }

    #[test]
    fn test_signed_negative_first_element() {
        let original = vec![-32i64, -31, -33];
        let mut values = original.clone();
        delta_encode_signed(&mut values);
        assert_eq!(values, vec![-32, 1, -2]);
        delta_decode_signed(&mut values);
        assert_eq!(values, original);
    }
}
