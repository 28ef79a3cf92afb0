//! Film grain textures.
//!
//! Two textures are generated once per render from fixed seeds and crossfaded per frame, so the
//! grain never "pops" at the loop boundary.

use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::foundation::error::{LoopcamError, LoopcamResult};
use crate::foundation::math::saturate_u8;
use crate::frame::FrameRgb8;

/// A fixed field of zero-mean Gaussian noise, one sample per pixel channel.
#[derive(Clone, Debug, PartialEq)]
pub struct GrainTexture {
    width: u32,
    height: u32,
    samples: Vec<f32>,
}

impl GrainTexture {
    /// Generate `width * height * 3` samples with standard deviation `strength` from `seed`.
    pub fn gaussian(width: u32, height: u32, strength: f32, seed: u64) -> LoopcamResult<Self> {
        if !strength.is_finite() || strength < 0.0 {
            return Err(LoopcamError::validation(
                "grain strength must be finite and >= 0",
            ));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| LoopcamError::validation("grain texture size overflow"))?;

        let normal = Normal::new(0.0, f64::from(strength))
            .map_err(|e| LoopcamError::validation(format!("grain distribution: {e}")))?;
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let samples = (0..len)
            .map(|_| normal.sample(&mut rng) as f32)
            .collect();

        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Texture width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Texture height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw noise samples, RGB-interleaved, row-major.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

/// Add `a * mix + b * (1 - mix)` to every channel of `frame`, saturating at `[0, 255]`.
///
/// The blended grain is truncated toward zero before it is added.
pub fn add_blended_grain(
    frame: &mut FrameRgb8,
    a: &GrainTexture,
    b: &GrainTexture,
    mix: f32,
) -> LoopcamResult<()> {
    for tex in [a, b] {
        if tex.width != frame.width || tex.height != frame.height {
            return Err(LoopcamError::validation(format!(
                "grain texture is {}x{}, frame is {}x{}",
                tex.width, tex.height, frame.width, frame.height
            )));
        }
    }

    let inv = 1.0 - mix;
    for ((c, &ga), &gb) in frame
        .data
        .iter_mut()
        .zip(a.samples.iter())
        .zip(b.samples.iter())
    {
        let grain = (ga * mix + gb * inv).trunc();
        *c = saturate_u8(f32::from(*c) + grain);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/grain.rs"]
mod tests;
