use crate::effects::blur::box_blur_rgb8;
use crate::foundation::error::{LoopcamError, LoopcamResult};
use crate::frame::FrameRgb8;

/// First column of the overlay band for a frame `width` pixels wide.
pub fn band_start_column(width: u32, start_fraction: f64) -> u32 {
    ((f64::from(width) * start_fraction).floor() as u32).min(width)
}

/// Blur the vertical band `[floor(width * start_fraction), width)` to hide an overlay mark.
///
/// The band is blurred as its own sub-image, so mirrored borders never pull in pixels from
/// outside it.
pub fn mask_overlay_band(
    src: &FrameRgb8,
    start_fraction: f64,
    kernel: u32,
) -> LoopcamResult<FrameRgb8> {
    if !(0.0..1.0).contains(&start_fraction) {
        return Err(LoopcamError::validation(
            "mask start fraction must be in [0, 1)",
        ));
    }

    let x0 = band_start_column(src.width, start_fraction);
    let band_w = src.width - x0;
    if band_w == 0 {
        return Ok(src.clone());
    }

    let row_bytes = src.width as usize * 3;
    let band_bytes = band_w as usize * 3;
    let band_off = x0 as usize * 3;

    let mut band = Vec::with_capacity(band_bytes * src.height as usize);
    for row in src.data.chunks_exact(row_bytes) {
        band.extend_from_slice(&row[band_off..]);
    }

    let blurred = box_blur_rgb8(&band, band_w, src.height, kernel)?;

    let mut out = src.clone();
    for (row, band_row) in out
        .data
        .chunks_exact_mut(row_bytes)
        .zip(blurred.chunks_exact(band_bytes))
    {
        row[band_off..].copy_from_slice(band_row);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/mask.rs"]
mod tests;
