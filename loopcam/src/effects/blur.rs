use crate::foundation::error::{LoopcamError, LoopcamResult};
use crate::foundation::math::reflect101_index;

/// Largest accepted kernel side. Keeps `255 * kernel^2` well inside `u64`.
pub const MAX_KERNEL: u32 = 1 << 16;

/// Normalized `kernel x kernel` box blur over a tightly packed RGB8 buffer.
///
/// Borders mirror without repeating the edge pixel. Even kernels anchor at `kernel / 2`.
pub fn box_blur_rgb8(src: &[u8], width: u32, height: u32, kernel: u32) -> LoopcamResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(3))
        .ok_or_else(|| LoopcamError::validation("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(LoopcamError::validation(
            "box_blur_rgb8 expects src matching width*height*3",
        ));
    }
    if kernel == 0 || kernel > MAX_KERNEL {
        return Err(LoopcamError::validation(format!(
            "blur kernel must be in 1..={MAX_KERNEL}"
        )));
    }
    if kernel == 1 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let taps = kernel_taps(kernel);
    let mut sums = vec![0u64; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut sums, width, height, &taps);
    vertical_pass(&sums, &mut out, width, height, &taps, u64::from(kernel).pow(2));
    Ok(out)
}

fn kernel_taps(kernel: u32) -> Vec<i64> {
    let lo = -i64::from(kernel / 2);
    (0..i64::from(kernel)).map(|k| lo + k).collect()
}

fn horizontal_pass(src: &[u8], dst: &mut [u64], width: u32, height: u32, taps: &[i64]) {
    let w = width as usize;
    for y in 0..height as usize {
        let row = y * w;
        for x in 0..w {
            let mut acc = [0u64; 3];
            for &d in taps {
                let sx = reflect101_index(x as i64 + d, w);
                let idx = (row + sx) * 3;
                for c in 0..3 {
                    acc[c] += u64::from(src[idx + c]);
                }
            }
            let out_idx = (row + x) * 3;
            dst[out_idx..out_idx + 3].copy_from_slice(&acc);
        }
    }
}

fn vertical_pass(
    src: &[u64],
    dst: &mut [u8],
    width: u32,
    height: u32,
    taps: &[i64],
    area: u64,
) {
    let w = width as usize;
    let h = height as usize;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 3];
            for &d in taps {
                let sy = reflect101_index(y as i64 + d, h);
                let idx = (sy * w + x) * 3;
                for c in 0..3 {
                    acc[c] += src[idx + c];
                }
            }
            let out_idx = (y * w + x) * 3;
            for c in 0..3 {
                dst[out_idx + c] = ((acc[c] + area / 2) / area).min(255) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
