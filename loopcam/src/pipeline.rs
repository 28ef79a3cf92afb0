use crate::config::SynthConfig;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::foundation::error::LoopcamResult;
use crate::synth::synthesizer::{LoopSynthesizer, RenderStats};

/// Load the configured still, synthesize the loop and encode it to `cfg.output_path`.
///
/// Requires `ffmpeg` on `PATH`. Either the whole file is written or an error is returned; there
/// are no retries.
pub fn render_loop_video(cfg: SynthConfig) -> LoopcamResult<RenderStats> {
    let synth = LoopSynthesizer::open(cfg)?;
    let cfg = synth.config();

    let opts = FfmpegSinkOpts::new(&cfg.output_path).with_output_height(cfg.output_height);
    let mut sink = FfmpegSink::new(opts);

    tracing::info!(out = %cfg.output_path.display(), "rendering looped video");
    let stats = synth.render_into(&mut sink)?;
    tracing::info!(
        frames = stats.frames_total,
        out = %cfg.output_path.display(),
        "done"
    );
    Ok(stats)
}
