use std::path::Path;

use anyhow::Context as _;
use clap::Parser;

/// Settings file picked up from the working directory when present.
const CONFIG_FILE: &str = "loopcam.json";

/// Render a seamlessly looping wobble/flicker/grain MP4 from a still image.
///
/// Settings come from `loopcam.json` in the working directory, or the built-in defaults.
/// Requires `ffmpeg` on PATH.
#[derive(Parser, Debug)]
#[command(name = "make-loop", version)]
struct Cli {}

fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cfg = load_config(Path::new(CONFIG_FILE))?;
    let stats = loopcam::render_loop_video(cfg.clone()).with_context(|| {
        format!(
            "render '{}' -> '{}'",
            cfg.image_path.display(),
            cfg.output_path.display()
        )
    })?;

    eprintln!(
        "wrote {} ({} frames); enable looping in your player for a continuous effect",
        cfg.output_path.display(),
        stats.frames_total
    );
    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<loopcam::SynthConfig> {
    if !path.exists() {
        tracing::info!("no {} found, using defaults", path.display());
        return Ok(loopcam::SynthConfig::default());
    }
    let cfg = loopcam::SynthConfig::from_path(path)
        .with_context(|| format!("load config '{}'", path.display()))?;
    tracing::info!("loaded settings from {}", path.display());
    Ok(cfg)
}
