use crate::foundation::math::reflect_index;
use crate::frame::FrameRgb8;

/// Shift `src` by `(dx, dy)` pixels: output `(x, y)` samples input `(x - dx, y - dy)`.
///
/// Samples that fall outside the image are reflected at the border (edge pixel repeated), so
/// the shifted frame never shows empty edges.
pub fn translate_reflect(src: &FrameRgb8, dx: i32, dy: i32) -> FrameRgb8 {
    if dx == 0 && dy == 0 {
        return src.clone();
    }

    let w = src.width as usize;
    let h = src.height as usize;
    let src_cols: Vec<usize> = (0..w)
        .map(|x| reflect_index(x as i64 - i64::from(dx), w))
        .collect();

    let row_bytes = w * 3;
    let mut data = vec![0u8; src.data.len()];
    for (y, dst_row) in data.chunks_exact_mut(row_bytes).enumerate() {
        let sy = reflect_index(y as i64 - i64::from(dy), h);
        let src_row = &src.data[sy * row_bytes..(sy + 1) * row_bytes];
        for (d, &sx) in dst_row.chunks_exact_mut(3).zip(&src_cols) {
            d.copy_from_slice(&src_row[sx * 3..sx * 3 + 3]);
        }
    }

    FrameRgb8 {
        width: src.width,
        height: src.height,
        data,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/wobble.rs"]
mod tests;
