use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::{FrameSink, SinkConfig, ensure_parent_dir};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{LoopcamError, LoopcamResult};
use crate::frame::FrameRgb8;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
    /// Scale to this height (aspect preserved). `None` keeps the frame size.
    pub output_height: Option<u32>,
    /// x264 preset.
    pub preset: String,
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            output_height: None,
            preset: "ultrafast".to_string(),
        }
    }

    /// Scale the encoded video to `height` pixels.
    pub fn with_output_height(mut self, height: Option<u32>) -> Self {
        self.output_height = height;
        self
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGB frames to its stdin.
///
/// ffmpeg encodes into a hidden sibling of the output path, which is renamed over the output
/// only after ffmpeg exits successfully. A failed or abandoned render leaves any previous file
/// at the output path untouched. The output never carries an audio track.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    partial: Option<PathBuf>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            partial: None,
            cfg: None,
            last_idx: None,
        }
    }

    fn join_stderr(&mut self) -> LoopcamResult<Vec<u8>> {
        match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| LoopcamError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| LoopcamError::encode(format!("ffmpeg stderr read failed: {e}"))),
            None => Ok(Vec::new()),
        }
    }

    /// Stop ffmpeg, discard the partial output and build an error carrying ffmpeg's stderr.
    fn abort(&mut self, reason: impl Into<String>) -> LoopcamError {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            // ffmpeg may already have exited; only reaping matters here.
            let _ = child.kill();
            let _ = child.wait();
        }
        let stderr = self.join_stderr().unwrap_or_default();
        if let Some(partial) = self.partial.take() {
            remove_partial(&partial);
        }
        self.cfg = None;

        let reason = reason.into();
        let stderr = String::from_utf8_lossy(&stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            LoopcamError::encode(reason)
        } else {
            LoopcamError::encode(format!("{reason}; ffmpeg: {stderr}"))
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> LoopcamResult<()> {
        if cfg.fps == 0 {
            return Err(LoopcamError::validation("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(LoopcamError::validation(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if let Some(h) = self.opts.output_height
            && (h == 0 || !h.is_multiple_of(2))
        {
            return Err(LoopcamError::validation(
                "ffmpeg sink output height must be non-zero and even (yuv420p mp4 output)",
            ));
        }

        let out_path = &self.opts.out_path;
        ensure_parent_dir(out_path)?;
        if !self.opts.overwrite && out_path.exists() {
            return Err(LoopcamError::validation(format!(
                "output file '{}' already exists",
                out_path.display()
            )));
        }
        // An existing target must stay writable; opening it for append leaves its bytes alone.
        if out_path.exists() {
            OpenOptions::new()
                .append(true)
                .open(out_path)
                .map_err(|e| LoopcamError::io(out_path, e))?;
        }

        // ffmpeg writes a sibling file that only replaces `out_path` once encoding succeeds.
        let partial = partial_path(out_path)?;
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&partial)
            .map_err(|e| LoopcamError::io(&partial, e))?;

        if !is_ffmpeg_on_path() {
            remove_partial(&partial);
            return Err(LoopcamError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .args(ffmpeg_args(&cfg, &self.opts, &partial));

        tracing::debug!(?cmd, "spawning ffmpeg");
        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                remove_partial(&partial);
                return Err(LoopcamError::encode(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                )));
            }
        };
        self.partial = Some(partial);

        let stdin = child.stdin.take();
        let stderr = child.stderr.take();
        self.child = Some(child);
        let (Some(stdin), Some(mut stderr)) = (stdin, stderr) else {
            return Err(self.abort("failed to open ffmpeg pipes (unexpected)"));
        };
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgb8) -> LoopcamResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| LoopcamError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(LoopcamError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(LoopcamError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(LoopcamError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        if let Err(e) = stdin.write_all(&frame.data) {
            return Err(self.abort(format!("failed to write frame to ffmpeg stdin: {e}")));
        }
        Ok(())
    }

    fn end(&mut self) -> LoopcamResult<()> {
        drop(self.stdin.take());
        let Some(child) = self.child.as_mut() else {
            return Err(LoopcamError::encode("ffmpeg sink not started"));
        };

        let status = match child.wait() {
            Ok(status) => status,
            Err(e) => return Err(self.abort(format!("failed to wait for ffmpeg to finish: {e}"))),
        };
        self.child = None;
        if !status.success() {
            return Err(self.abort(format!("ffmpeg exited with status {status}")));
        }
        self.join_stderr()?;

        let out_path = &self.opts.out_path;
        let Some(partial) = self.partial.take() else {
            return Err(LoopcamError::encode("ffmpeg sink lost its partial output"));
        };
        if !self.opts.overwrite && out_path.exists() {
            remove_partial(&partial);
            return Err(LoopcamError::validation(format!(
                "output file '{}' already exists",
                out_path.display()
            )));
        }
        if let Err(e) = std::fs::rename(&partial, out_path) {
            remove_partial(&partial);
            return Err(LoopcamError::io(out_path, e));
        }

        self.cfg = None;
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if self.child.is_some() || self.partial.is_some() {
            let err = self.abort("ffmpeg sink dropped before end()");
            tracing::debug!(%err, "discarded unfinished output");
        }
    }
}

/// Hidden sibling of `out_path` that ffmpeg writes into.
fn partial_path(out_path: &Path) -> LoopcamResult<PathBuf> {
    let name = out_path.file_name().ok_or_else(|| {
        LoopcamError::validation(format!(
            "output path '{}' has no file name",
            out_path.display()
        ))
    })?;
    let mut partial = OsString::from(".");
    partial.push(name);
    partial.push(".partial");
    Ok(out_path.with_file_name(partial))
}

fn remove_partial(path: &Path) {
    if let Err(e) = std::fs::remove_file(path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove partial output");
    }
}

/// `-vf` expression: scale to the requested height, or round the size down to even numbers.
fn scale_filter(output_height: Option<u32>) -> String {
    match output_height {
        Some(h) => format!("scale=-2:{h}"),
        None => "scale=trunc(iw/2)*2:trunc(ih/2)*2".to_string(),
    }
}

/// Arguments for encoding into `dest`. `dest` is the sink's own partial file, so it is always
/// overwritten; [`FfmpegSinkOpts::overwrite`] is enforced when the result is moved into place.
fn ffmpeg_args(cfg: &SinkConfig, opts: &FfmpegSinkOpts, dest: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into()];
    for a in [
        "-loglevel".to_string(),
        "error".to_string(),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pix_fmt".to_string(),
        "rgb24".to_string(),
        "-s".to_string(),
        format!("{}x{}", cfg.width, cfg.height),
        // For rawvideo input, `-r` before `-i` sets the input frame rate.
        "-r".to_string(),
        cfg.fps.to_string(),
        "-i".to_string(),
        "pipe:0".to_string(),
        "-an".to_string(),
        "-vf".to_string(),
        scale_filter(opts.output_height),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        opts.preset.clone(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        "-movflags".to_string(),
        "+faststart".to_string(),
        // The partial file name carries no usable extension.
        "-f".to_string(),
        "mp4".to_string(),
    ] {
        args.push(a.into());
    }
    args.push(dest.as_os_str().to_owned());
    args
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
