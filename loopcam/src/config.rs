use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::effects::blur::MAX_KERNEL;
use crate::foundation::error::{LoopcamError, LoopcamResult};

/// Everything the synthesizer needs to turn one still into a looping video.
///
/// Every field has a default, so a JSON document only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SynthConfig {
    /// Source still. Default `parking_image.png`.
    pub image_path: PathBuf,
    /// Output MP4. Default `parking_lot_wobble_effect_looped.mp4`.
    pub output_path: PathBuf,
    /// Frames per second. Default 20.
    pub fps: u32,
    /// Loop length in whole seconds. Default 15.
    pub duration_seconds: u32,
    /// Height of the encoded video, width follows the aspect ratio. `None` keeps the source
    /// size. Default 720.
    pub output_height: Option<u32>,
    /// Standard deviation of the grain textures, in channel units. Default 3.
    pub grain_strength: f32,
    /// Peak relative brightness change. Default 0.02.
    pub flicker_strength: f32,
    /// Peak camera-shake offset in pixels. Default 1.
    pub wobble_pixels: f32,
    /// Fraction of the width where the blurred overlay band starts. Default 0.85.
    pub mask_start: f64,
    /// Box-blur size used on the overlay band. Default 25.
    pub mask_kernel: u32,
    /// Seeds of grain textures A and B. Default `[0, 1]`.
    pub grain_seeds: [u64; 2],
    /// Frame scheduling.
    pub render: RenderOpts,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from("parking_image.png"),
            output_path: PathBuf::from("parking_lot_wobble_effect_looped.mp4"),
            fps: 20,
            duration_seconds: 15,
            output_height: Some(720),
            grain_strength: 3.0,
            flicker_strength: 0.02,
            wobble_pixels: 1.0,
            mask_start: 0.85,
            mask_kernel: 25,
            grain_seeds: [0, 1],
            render: RenderOpts::default(),
        }
    }
}

/// Options controlling how frames are scheduled onto threads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RenderOpts {
    /// Render frames on a rayon thread pool. Sinks still see frames in index order.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Frames rendered per parallel batch.
    pub chunk_size: usize,
    /// Bounded channel capacity between render workers and the encoder thread.
    pub channel_capacity: usize,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            chunk_size: 32,
            channel_capacity: 4,
        }
    }
}

impl SynthConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> LoopcamResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| LoopcamError::validation(format!("parse config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> LoopcamResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LoopcamError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Total number of frames in the loop: `fps * duration_seconds`.
    pub fn frame_count(&self) -> u64 {
        u64::from(self.fps) * u64::from(self.duration_seconds)
    }

    /// Reject values the synthesizer cannot honour.
    pub fn validate(&self) -> LoopcamResult<()> {
        if self.fps == 0 {
            return Err(LoopcamError::validation("fps must be > 0"));
        }
        if self.duration_seconds == 0 {
            return Err(LoopcamError::validation("durationSeconds must be > 0"));
        }
        if let Some(h) = self.output_height
            && (h == 0 || !h.is_multiple_of(2))
        {
            // yuv420p needs even dimensions.
            return Err(LoopcamError::validation(
                "outputHeight must be a non-zero even number",
            ));
        }
        for (name, v) in [
            ("grainStrength", self.grain_strength),
            ("flickerStrength", self.flicker_strength),
            ("wobblePixels", self.wobble_pixels),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(LoopcamError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if !(0.0..1.0).contains(&self.mask_start) {
            return Err(LoopcamError::validation("maskStart must be in [0, 1)"));
        }
        if self.mask_kernel == 0 || self.mask_kernel > MAX_KERNEL {
            return Err(LoopcamError::validation(format!(
                "maskKernel must be in 1..={MAX_KERNEL}"
            )));
        }
        if self.render.threads == Some(0) {
            return Err(LoopcamError::validation("threads must be >= 1 when set"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
