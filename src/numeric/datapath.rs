// ============================================================================
// Datapath Primitives
// Width-explicit integer operations of the exp/softplus pipeline
// ============================================================================
//
// Each stage of the hardware pipeline is a separate function so the narrowing,
// widening and shifting behaviour can be checked in isolation:
// - multiply_wide: double-width signed product
// - rescale: arithmetic shift right by F
// - narrow_to_width: two's-complement truncation to a register width
// - split_exponent: integer / fractional split of a Q value
// - select_segment: bounded segment index from the fractional part
// - shift_by_exponent: scaling by 2^u in a wide intermediate
// - saturate: clamp to the format range, reporting whether it clamped

use super::format::FixedPointFormat;

/// Largest left shift ever applied. Any non-zero mantissa shifted this far is
/// already outside every supported width, so further shifting cannot change
/// the saturated result.
const MAX_LEFT_SHIFT: u32 = 64;

/// Largest right shift applied to an `i128` intermediate.
const MAX_RIGHT_SHIFT: u32 = 127;

/// Signed product in a double-width intermediate.
///
/// Operands are at most 32 significant bits wide, so the product cannot
/// overflow `i64`.
#[inline]
pub fn multiply_wide(lhs: i64, rhs: i64) -> i64 {
    lhs * rhs
}

/// Arithmetic shift right by `frac_bits`, dropping the extra fractional bits
/// of a Q(2F) product (rounds toward negative infinity).
#[inline]
pub fn rescale(product: i64, frac_bits: u32) -> i64 {
    product >> frac_bits
}

/// Keep the low `width` bits of `value` and sign-extend them.
///
/// This is what storing into a `width`-bit register does; it wraps, it does
/// not saturate.
#[inline]
pub fn narrow_to_width(value: i64, width: u32) -> i64 {
    debug_assert!((1..=64).contains(&width));
    let unused = 64 - width;
    (value << unused) >> unused
}

/// Split a Q value into `(integer_part, fraction)`.
///
/// The integer part is the sign-extending shift `z >> F`; the fraction is
/// `z & (2^F - 1)` and is never negative.
#[inline]
pub fn split_exponent(z: i64, frac_bits: u32) -> (i64, i64) {
    let mask = (1i64 << frac_bits) - 1;
    (z >> frac_bits, z & mask)
}

/// Segment index `fraction >> (F - log2 N)`, clamped to `[0, N - 1]`.
///
/// `segments` must be a non-zero power of two. For every `fraction` in
/// `[0, 2^F)` the shift alone already lands in range; the clamp covers
/// tables whose `log2 N` exceeds `F` and any caller passing a value outside
/// the fractional domain.
#[inline]
pub fn select_segment(fraction: i64, frac_bits: u32, segments: usize) -> usize {
    let last = segments.saturating_sub(1);
    let segment_bits = segments.max(1).trailing_zeros();
    let shift = frac_bits.saturating_sub(segment_bits);
    let index = (fraction.max(0) >> shift) as u64;
    index.min(last as u64) as usize
}

/// Scale `mantissa` by `2^exponent` in a wide intermediate.
///
/// Non-negative exponents shift left; negative exponents shift right
/// arithmetically by `|exponent|`.
#[inline]
pub fn shift_by_exponent(mantissa: i64, exponent: i64) -> i128 {
    let wide = mantissa as i128;
    if exponent >= 0 {
        let amount = exponent.min(MAX_LEFT_SHIFT as i64) as u32;
        wide << amount
    } else {
        let amount = exponent.unsigned_abs().min(MAX_RIGHT_SHIFT as u64) as u32;
        wide >> amount
    }
}

/// Clamp `value` to `[-2^(W-1), 2^(W-1) - 1]`.
///
/// Returns the narrowed value and whether clamping changed it.
#[inline]
pub fn saturate(value: i128, format: FixedPointFormat) -> (i32, bool) {
    let min = format.min_raw() as i128;
    let max = format.max_raw() as i128;
    let clamped = value.clamp(min, max);
    (clamped as i32, clamped != value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiply_wide_and_rescale() {
        // 1.0 * log2(e) in Q4.12
        let product = multiply_wide(4096, 5909);
        assert_eq!(product, 24_203_264);
        assert_eq!(rescale(product, 12), 5909);

        // Negative products round toward negative infinity
        assert_eq!(rescale(multiply_wide(-1, 5909), 12), -2);
    }

    #[test]
    fn test_narrow_to_width_wraps() {
        assert_eq!(narrow_to_width(32767, 16), 32767);
        assert_eq!(narrow_to_width(32768, 16), -32768);
        assert_eq!(narrow_to_width(65535, 16), -1);
        assert_eq!(narrow_to_width(-32769, 16), 32767);
        assert_eq!(narrow_to_width(-5, 16), -5);
        assert_eq!(narrow_to_width(i64::MAX, 64), i64::MAX);
    }

    #[test]
    fn test_split_exponent() {
        // 1.442 in Q4.12
        assert_eq!(split_exponent(5909, 12), (1, 1813));
        // -1.442: floor is -2, fraction is 0.557
        assert_eq!(split_exponent(-5909, 12), (-2, 2283));
        assert_eq!(split_exponent(-1, 12), (-1, 4095));
        assert_eq!(split_exponent(0, 12), (0, 0));
    }

    #[test]
    fn test_select_segment_boundaries() {
        assert_eq!(select_segment(0, 12, 16), 0);
        assert_eq!(select_segment(255, 12, 16), 0);
        assert_eq!(select_segment(256, 12, 16), 1);
        assert_eq!(select_segment(4095, 12, 16), 15);
        // Outside the fractional domain still clamps
        assert_eq!(select_segment(4096, 12, 16), 15);
        assert_eq!(select_segment(-7, 12, 16), 0);
        // More segments than fractional resolution
        assert_eq!(select_segment(3, 2, 16), 3);
        assert_eq!(select_segment(0, 12, 1), 0);
    }

    #[test]
    fn test_select_segment_last_for_every_power_of_two() {
        for frac_bits in 1..=31u32 {
            for log_n in 0..=frac_bits.min(10) {
                let segments = 1usize << log_n;
                let max_fraction = (1i64 << frac_bits) - 1;
                assert_eq!(
                    select_segment(max_fraction, frac_bits, segments),
                    segments - 1,
                    "F={} N={}",
                    frac_bits,
                    segments
                );
            }
        }
    }

    #[test]
    fn test_shift_by_exponent() {
        assert_eq!(shift_by_exponent(5567, 1), 11134);
        assert_eq!(shift_by_exponent(6027, -2), 1506);
        assert_eq!(shift_by_exponent(-4096, -1), -2048);
        assert_eq!(shift_by_exponent(-1, -3), -1);
        assert_eq!(shift_by_exponent(1, 0), 1);
        // Huge exponents do not panic
        assert_eq!(shift_by_exponent(1, 1 << 40), 1i128 << 64);
        assert_eq!(shift_by_exponent(0, 1 << 40), 0);
        assert_eq!(shift_by_exponent(12345, -(1 << 40)), 0);
        assert_eq!(shift_by_exponent(-12345, -(1 << 40)), -1);
    }

    #[test]
    fn test_saturate() {
        let q = FixedPointFormat::Q4_12;
        assert_eq!(saturate(11134, q), (11134, false));
        assert_eq!(saturate(32767, q), (32767, false));
        assert_eq!(saturate(32768, q), (32767, true));
        assert_eq!(saturate(-32769, q), (-32768, true));
        assert_eq!(saturate(1i128 << 90, q), (32767, true));
    }
}
