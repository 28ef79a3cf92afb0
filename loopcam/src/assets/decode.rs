use std::path::Path;

use crate::foundation::error::{LoopcamError, LoopcamResult};
use crate::frame::FrameRgb8;

/// Read and decode the source still from disk.
///
/// Any format the `image` crate understands is accepted; alpha is dropped.
pub fn load_source_image(path: &Path) -> LoopcamResult<FrameRgb8> {
    let bytes = std::fs::read(path).map_err(|e| {
        LoopcamError::asset(format!("read source image '{}': {e}", path.display()))
    })?;
    decode_rgb8(&bytes)
        .map_err(|e| LoopcamError::asset(format!("source image '{}': {e}", path.display())))
}

/// Decode encoded image bytes into an RGB8 frame.
pub fn decode_rgb8(bytes: &[u8]) -> LoopcamResult<FrameRgb8> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| LoopcamError::asset(format!("decode image from memory: {e}")))?;
    let rgb = dyn_img.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(LoopcamError::asset("decoded image has no pixels"));
    }
    Ok(FrameRgb8::from(rgb))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
