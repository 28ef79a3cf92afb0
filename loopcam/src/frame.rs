use crate::foundation::error::{LoopcamError, LoopcamResult};

/// An RGB8 pixel grid, tightly packed, row-major.
///
/// Used for the source image, the masked base and every synthesized frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgb8 {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB8 bytes, `width * height * 3` long.
    pub data: Vec<u8>,
}

impl FrameRgb8 {
    /// Wrap `data`, checking it matches `width * height * 3`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> LoopcamResult<Self> {
        if width == 0 || height == 0 {
            return Err(LoopcamError::validation("frame width/height must be non-zero"));
        }
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(LoopcamError::validation(format!(
                "frame data length {} does not match {width}x{height}x3 = {expected}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A black frame.
    pub fn black(width: u32, height: u32) -> LoopcamResult<Self> {
        Self::new(width, height, vec![0u8; byte_len(width, height)?])
    }

    /// Build a frame by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> [u8; 3],
    ) -> LoopcamResult<Self> {
        let mut data = Vec::with_capacity(byte_len(width, height)?);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self::new(width, height, data)
    }

    /// RGB value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    pub(crate) fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    /// Convert into an `image` buffer (e.g. for saving a still).
    pub fn into_image(self) -> LoopcamResult<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.data)
            .ok_or_else(|| LoopcamError::validation("frame data does not match its dimensions"))
    }
}

impl From<image::RgbImage> for FrameRgb8 {
    fn from(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

fn byte_len(width: u32, height: u32) -> LoopcamResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(3))
        .ok_or_else(|| LoopcamError::validation("frame buffer size overflow"))
}

#[cfg(test)]
#[path = "../tests/unit/frame.rs"]
mod tests;
