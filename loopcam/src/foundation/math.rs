/// Mirror `i` into `[0, n)` repeating the edge sample: `fedcba|abcdefgh|hgfedcb`.
pub(crate) fn reflect_index(i: i64, n: usize) -> usize {
    debug_assert!(n > 0);
    let n = n as i64;
    let m = i.rem_euclid(2 * n);
    (if m < n { m } else { 2 * n - 1 - m }) as usize
}

/// Mirror `i` into `[0, n)` without repeating the edge sample: `gfedcb|abcdefgh|gfedcba`.
pub(crate) fn reflect101_index(i: i64, n: usize) -> usize {
    debug_assert!(n > 0);
    if n == 1 {
        return 0;
    }
    let n = n as i64;
    let period = 2 * n - 2;
    let m = i.rem_euclid(period);
    (if m < n { m } else { period - m }) as usize
}

/// Clamp to the channel range and truncate toward zero.
pub(crate) fn saturate_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
