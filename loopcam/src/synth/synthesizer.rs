use std::collections::HashMap;
use std::sync::{Arc, mpsc};

use rayon::prelude::*;

use crate::assets::decode::load_source_image;
use crate::config::{RenderOpts, SynthConfig};
use crate::effects::flicker::apply_flicker;
use crate::effects::grain::{GrainTexture, add_blended_grain};
use crate::effects::mask::mask_overlay_band;
use crate::effects::wobble::translate_reflect;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{LoopcamError, LoopcamResult};
use crate::frame::FrameRgb8;
use crate::synth::phase::LoopParams;

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Total frames delivered to the sink.
    pub frames_total: u64,
    /// Frames synthesized.
    pub frames_rendered: u64,
}

/// Turns one still into a seamlessly looping frame sequence.
///
/// Construction front-loads everything that does not depend on the frame index: the masked base
/// image and both grain textures. Each frame is then a pure function of its index.
pub struct LoopSynthesizer {
    cfg: SynthConfig,
    base: FrameRgb8,
    grain_a: GrainTexture,
    grain_b: GrainTexture,
    frame_count: u64,
}

impl LoopSynthesizer {
    /// Load `cfg.image_path` and prepare the synthesizer.
    ///
    /// Fails before any frame is generated when the image is missing or unreadable.
    #[tracing::instrument(skip(cfg), fields(image = %cfg.image_path.display()))]
    pub fn open(cfg: SynthConfig) -> LoopcamResult<Self> {
        cfg.validate()?;
        let source = load_source_image(&cfg.image_path)?;
        Self::from_image(cfg, source)
    }

    /// Prepare the synthesizer from an already decoded still.
    pub fn from_image(cfg: SynthConfig, source: FrameRgb8) -> LoopcamResult<Self> {
        cfg.validate()?;
        let base = mask_overlay_band(&source, cfg.mask_start, cfg.mask_kernel)?;
        let [seed_a, seed_b] = cfg.grain_seeds;
        let grain_a = GrainTexture::gaussian(base.width, base.height, cfg.grain_strength, seed_a)?;
        let grain_b = GrainTexture::gaussian(base.width, base.height, cfg.grain_strength, seed_b)?;
        tracing::debug!(
            width = base.width,
            height = base.height,
            "masked base and grain textures ready"
        );
        Ok(Self {
            frame_count: cfg.frame_count(),
            cfg,
            base,
            grain_a,
            grain_b,
        })
    }

    /// The configuration this synthesizer was built with.
    pub fn config(&self) -> &SynthConfig {
        &self.cfg
    }

    /// Number of frames in the loop, `fps * duration_seconds`.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// The source still with its overlay band blurred.
    pub fn masked_base(&self) -> &FrameRgb8 {
        &self.base
    }

    /// Effect parameters of frame `idx`.
    pub fn params(&self, idx: FrameIndex) -> LoopParams {
        LoopParams::at(idx, self.frame_count, &self.cfg)
    }

    /// Synthesize frame `idx`: shift, flicker, then grain.
    pub fn render_frame(&self, idx: FrameIndex) -> LoopcamResult<FrameRgb8> {
        if !FrameRange::full(self.frame_count).contains(idx) {
            return Err(LoopcamError::validation(format!(
                "frame {} is outside the loop of {} frames",
                idx.0, self.frame_count
            )));
        }

        let p = self.params(idx);
        let mut frame = translate_reflect(&self.base, p.dx, p.dy);
        apply_flicker(&mut frame, p.flicker);
        add_blended_grain(&mut frame, &self.grain_a, &self.grain_b, p.mix)?;
        Ok(frame)
    }

    /// Synthesize the whole loop and stream it into `sink`.
    ///
    /// The sink receives frames in strictly increasing index order. When parallel rendering is
    /// enabled, out-of-order worker completion is reordered at the sink boundary (bounded
    /// channel backpressure).
    #[tracing::instrument(skip(self, sink), fields(frames = self.frame_count))]
    pub fn render_into(&self, sink: &mut dyn FrameSink) -> LoopcamResult<RenderStats> {
        let range = FrameRange::full(self.frame_count);
        if range.is_empty() {
            return Err(LoopcamError::validation("loop must contain at least one frame"));
        }
        let opts = &self.cfg.render;

        let cfg = SinkConfig {
            width: self.base.width,
            height: self.base.height,
            fps: self.cfg.fps,
            frame_count: self.frame_count,
        };

        let pool = if opts.parallel {
            Some(build_thread_pool(opts.threads)?)
        } else {
            None
        };
        let chunk_size = normalized_chunk_size(opts).min(range.len_frames());

        tracing::info!(parallel = opts.parallel, "generating loopable frames");

        // Encoder thread: enforce in-order delivery to the sink regardless of render completion
        // order.
        std::thread::scope(|scope| -> LoopcamResult<RenderStats> {
            let (tx, rx) = mpsc::sync_channel::<FrameMsg>(opts.channel_capacity.max(1));
            let range_start = range.start.0;
            let range_end = range.end.0;
            let sink_ref: &mut dyn FrameSink = sink;

            let enc = scope.spawn(move || -> LoopcamResult<()> {
                sink_ref.begin(cfg)?;

                let mut next = range_start;
                let mut pending = HashMap::<u64, Arc<FrameRgb8>>::new();
                while next < range_end {
                    let msg = rx.recv().map_err(|_| {
                        LoopcamError::encode("encoder channel disconnected unexpectedly")
                    })?;
                    pending.insert(msg.idx.0, msg.frame);

                    while let Some(frame) = pending.remove(&next) {
                        sink_ref.push_frame(FrameIndex(next), &frame)?;
                        next += 1;
                    }
                }

                sink_ref.end()?;
                Ok(())
            });

            let mut stats = RenderStats::default();
            let produce_res = (|| -> Result<(), Produce> {
                let mut chunk_start = range_start;
                while chunk_start < range_end {
                    let chunk_end = (chunk_start + chunk_size).min(range_end);
                    match pool.as_ref() {
                        Some(pool) => self.render_chunk_parallel(pool, chunk_start, chunk_end, &tx)?,
                        None => {
                            for f in chunk_start..chunk_end {
                                let frame = self.render_frame(FrameIndex(f))?;
                                send_frame(&tx, FrameIndex(f), Arc::new(frame))?;
                            }
                        }
                    }
                    stats.frames_rendered += chunk_end - chunk_start;
                    stats.frames_total += chunk_end - chunk_start;
                    tracing::debug!(done = chunk_end, total = range_end, "chunk rendered");
                    chunk_start = chunk_end;
                }
                Ok(())
            })();

            drop(tx);
            let enc_res = enc
                .join()
                .map_err(|_| LoopcamError::encode("encoder thread panicked"))?;

            match produce_res {
                Err(Produce::Failed(e)) => Err(e),
                // The encoder hung up early; its own error says why.
                Err(Produce::SinkClosed) => match enc_res {
                    Err(e) => Err(e),
                    Ok(()) => Err(LoopcamError::encode(
                        "encoder thread is not accepting frames",
                    )),
                },
                Ok(()) => enc_res.map(|()| stats),
            }
        })
    }

    fn render_chunk_parallel(
        &self,
        pool: &rayon::ThreadPool,
        chunk_start: u64,
        chunk_end: u64,
        tx: &mpsc::SyncSender<FrameMsg>,
    ) -> Result<(), Produce> {
        let frames = pool.install(|| {
            (chunk_start..chunk_end)
                .into_par_iter()
                .map(|f| self.render_frame(FrameIndex(f)).map(|fr| (f, fr)))
                .collect::<LoopcamResult<Vec<_>>>()
        })?;
        for (f, frame) in frames {
            send_frame(tx, FrameIndex(f), Arc::new(frame))?;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct FrameMsg {
    idx: FrameIndex,
    frame: Arc<FrameRgb8>,
}

/// Why the producer side of `render_into` stopped early.
enum Produce {
    Failed(LoopcamError),
    SinkClosed,
}

impl From<LoopcamError> for Produce {
    fn from(e: LoopcamError) -> Self {
        Self::Failed(e)
    }
}

fn send_frame(
    tx: &mpsc::SyncSender<FrameMsg>,
    idx: FrameIndex,
    frame: Arc<FrameRgb8>,
) -> Result<(), Produce> {
    tx.send(FrameMsg { idx, frame })
        .map_err(|_| Produce::SinkClosed)
}

fn normalized_chunk_size(opts: &RenderOpts) -> u64 {
    opts.chunk_size.max(1) as u64
}

fn build_thread_pool(threads: Option<usize>) -> LoopcamResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(LoopcamError::validation("threads must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LoopcamError::encode(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/synth/synthesizer.rs"]
mod tests;
