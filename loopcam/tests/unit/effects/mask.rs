use super::*;

fn checkerboard(w: u32, h: u32) -> FrameRgb8 {
    FrameRgb8::from_fn(w, h, |x, y| {
        let v = if (x + y) % 2 == 0 { 255 } else { 0 };
        [v, v, v]
    })
    .unwrap()
}

#[test]
fn band_start_truncates() {
    assert_eq!(band_start_column(100, 0.85), 85);
    assert_eq!(band_start_column(41, 0.85), 34);
    assert_eq!(band_start_column(1, 0.85), 0);
}

#[test]
fn pixels_left_of_band_are_untouched() {
    let src = checkerboard(40, 12);
    let out = mask_overlay_band(&src, 0.85, 5).unwrap();
    let x0 = band_start_column(40, 0.85);
    for y in 0..12 {
        for x in 0..x0 {
            assert_eq!(out.pixel(x, y), src.pixel(x, y));
        }
    }
}

#[test]
fn band_is_smoothed() {
    let src = checkerboard(40, 12);
    let out = mask_overlay_band(&src, 0.85, 5).unwrap();
    let x0 = band_start_column(40, 0.85);
    let changed = (0..12)
        .flat_map(|y| (x0..40).map(move |x| (x, y)))
        .filter(|&(x, y)| out.pixel(x, y) != src.pixel(x, y))
        .count();
    assert!(changed > 0);
}

#[test]
fn invalid_fraction_is_rejected() {
    let src = checkerboard(4, 4);
    assert!(mask_overlay_band(&src, 1.0, 3).is_err());
    assert!(mask_overlay_band(&src, -0.1, 3).is_err());
}
