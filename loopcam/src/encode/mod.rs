//! Encoding sinks.
//!
//! Sinks consume synthesized frames in loop order and are driven by
//! `LoopSynthesizer::render_into`.

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
