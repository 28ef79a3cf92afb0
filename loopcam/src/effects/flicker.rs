use crate::foundation::math::saturate_u8;
use crate::frame::FrameRgb8;

/// Scale every channel by `gain`, saturating at `[0, 255]`.
pub fn apply_flicker(frame: &mut FrameRgb8, gain: f32) {
    if gain == 1.0 {
        return;
    }
    for c in frame.data.iter_mut() {
        *c = saturate_u8(f32::from(*c) * gain);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/flicker.rs"]
mod tests;
