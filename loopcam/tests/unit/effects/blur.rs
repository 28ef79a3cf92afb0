use super::*;

#[test]
fn blur_kernel_1_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6];
    let out = box_blur_rgb8(&src, 1, 2, 1).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_kernel_0_is_rejected() {
    assert!(box_blur_rgb8(&[0u8; 3], 1, 1, 0).is_err());
}

#[test]
fn blur_rejects_wrong_length() {
    assert!(box_blur_rgb8(&[0u8; 5], 1, 2, 3).is_err());
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (6u32, 4u32);
    let src = [10u8, 20, 30].repeat((w * h) as usize);
    let out = box_blur_rgb8(&src, w, h, 25).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_averages_a_3x3_neighbourhood() {
    // Single bright pixel in the middle of a 5x5 field, 3x3 kernel.
    let (w, h) = (5u32, 5u32);
    let mut src = vec![0u8; (w * h * 3) as usize];
    let center = ((2 * w + 2) * 3) as usize;
    src[center..center + 3].copy_from_slice(&[90, 90, 90]);

    let out = box_blur_rgb8(&src, w, h, 3).unwrap();

    for y in 0..h {
        for x in 0..w {
            let i = ((y * w + x) * 3) as usize;
            let near = x.abs_diff(2) <= 1 && y.abs_diff(2) <= 1;
            assert_eq!(out[i], if near { 10 } else { 0 }, "pixel ({x},{y})");
        }
    }
}

#[test]
fn blur_mirrors_at_borders() {
    // 3x1 row [0, 0, 90] with a 3-wide kernel: the right edge mirrors to [0, 90, 0].
    let src = vec![0u8, 0, 0, 0, 0, 0, 90, 90, 90];
    let out = box_blur_rgb8(&src, 3, 1, 3).unwrap();
    // Vertical pass on a 1-row image reads the same row three times.
    assert_eq!(out[0], 0);
    assert_eq!(out[3], 30);
    assert_eq!(out[6], 30);
}

#[test]
fn blur_rejects_oversized_kernel() {
    assert!(box_blur_rgb8(&[0u8; 3], 1, 1, MAX_KERNEL + 1).is_err());
}

#[test]
fn blur_largest_kernel_does_not_overflow() {
    // Every tap sees the brightest value, so the average must stay at 255.
    let (w, h) = (3u32, 2u32);
    let src = vec![255u8; (w * h * 3) as usize];
    let out = box_blur_rgb8(&src, w, h, MAX_KERNEL).unwrap();
    assert_eq!(out, src);

    // A two-level image averages to a value between the levels.
    let mut mixed = vec![0u8; (w * h * 3) as usize];
    mixed[..9].fill(255);
    let out = box_blur_rgb8(&mixed, w, h, MAX_KERNEL - 1).unwrap();
    assert!(out.iter().all(|&v| v > 0 && v < 255), "{out:?}");
}
