use std::f64::consts::TAU;

use crate::config::SynthConfig;
use crate::foundation::core::FrameIndex;

/// Loop phase of frame `idx` out of `frame_count`: `idx / frame_count * 2π`.
///
/// The phase never reaches `2π`, so frame `frame_count` would coincide with frame 0.
pub fn phase(idx: FrameIndex, frame_count: u64) -> f64 {
    if frame_count == 0 {
        return 0.0;
    }
    idx.0 as f64 / frame_count as f64 * TAU
}

/// Per-frame effect parameters, all closed-form functions of the loop phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopParams {
    /// Loop phase in `[0, 2π)`.
    pub t: f64,
    /// Horizontal shake, `round(sin(2t) * wobble)`.
    pub dx: i32,
    /// Vertical shake, `round(cos(2t) * wobble)`.
    pub dy: i32,
    /// Brightness multiplier, `1 + sin(3t) * flicker_strength`.
    pub flicker: f32,
    /// Weight of grain texture A, `(1 + sin(t)) / 2`.
    pub mix: f32,
}

impl LoopParams {
    /// Parameters of frame `idx` in a loop of `frame_count` frames.
    pub fn at(idx: FrameIndex, frame_count: u64, cfg: &SynthConfig) -> Self {
        let t = phase(idx, frame_count);
        let wobble = f64::from(cfg.wobble_pixels);
        Self {
            t,
            dx: ((2.0 * t).sin() * wobble).round() as i32,
            dy: ((2.0 * t).cos() * wobble).round() as i32,
            flicker: (1.0 + (3.0 * t).sin() * f64::from(cfg.flicker_strength)) as f32,
            mix: ((1.0 + t.sin()) / 2.0) as f32,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/synth/phase.rs"]
mod tests;
