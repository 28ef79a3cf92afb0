//! loopcam turns a single still image into a seamlessly looping "CCTV" clip.
//!
//! Every frame is a closed-form function of a loop phase `t = i / n * 2π`: the image is shaken
//! by a small reflected translation, its brightness flickers, and film grain crossfades between
//! two fixed textures. Because every term is periodic in `t`, the last frame runs straight into
//! the first.
//!
//! - Build a [`SynthConfig`] (or load one from JSON)
//! - Create a [`LoopSynthesizer`]
//! - Render single frames or stream the loop into a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod effects;
mod foundation;

/// Synthesizer configuration.
pub mod config;
/// Encoding sinks.
pub mod encode;
/// RGB8 frame buffer.
pub mod frame;
/// One-call render-to-MP4 entry point.
pub mod pipeline;
pub(crate) mod synth;

pub use crate::assets::decode::{decode_rgb8, load_source_image};
pub use crate::config::{RenderOpts, SynthConfig};
pub use crate::effects::grain::GrainTexture;
pub use crate::effects::mask::band_start_column;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::foundation::core::{FrameIndex, FrameRange};
pub use crate::foundation::error::{LoopcamError, LoopcamResult};
pub use crate::frame::FrameRgb8;
pub use crate::pipeline::render_loop_video;
pub use crate::synth::phase::{LoopParams, phase};
pub use crate::synth::synthesizer::{LoopSynthesizer, RenderStats};
