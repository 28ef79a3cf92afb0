use super::*;

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 64,
        height: 48,
        fps: 20,
        frame_count: 300,
    }
}

fn args_as_strings(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> Vec<String> {
    let dest = partial_path(&opts.out_path).unwrap();
    ffmpeg_args(cfg, opts, &dest)
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

fn value_after<'a>(args: &'a [String], flag: &str) -> &'a str {
    let pos = args.iter().position(|a| a == flag).unwrap();
    &args[pos + 1]
}

#[test]
fn args_stream_rgb24_without_audio() {
    let opts = FfmpegSinkOpts::new("out/loop.mp4").with_output_height(Some(720));
    let args = args_as_strings(&cfg(), &opts);

    assert_eq!(args[0], "-y");
    assert_eq!(value_after(&args, "-f"), "rawvideo");
    assert_eq!(value_after(&args, "-s"), "64x48");
    assert_eq!(value_after(&args, "-r"), "20");
    assert_eq!(value_after(&args, "-vf"), "scale=-2:720");
    assert_eq!(value_after(&args, "-c:v"), "libx264");
    assert_eq!(value_after(&args, "-preset"), "ultrafast");
    assert!(args.iter().any(|a| a == "-an"));
    assert!(args.iter().any(|a| a == "rgb24"));
    assert_eq!(value_after(&args, "-movflags"), "+faststart");
    // The container is named explicitly because ffmpeg writes the partial file.
    let last_f = args.iter().rposition(|a| a == "-f").unwrap();
    assert_eq!(args[last_f + 1], "mp4");
    assert_eq!(args.last().map(String::as_str), Some("out/.loop.mp4.partial"));
}

#[test]
fn args_keep_size_when_no_height_requested() {
    let mut opts = FfmpegSinkOpts::new("loop.mp4");
    opts.overwrite = false;
    let args = args_as_strings(&cfg(), &opts);
    // The partial file belongs to the sink; `overwrite` is checked when it is moved into place.
    assert_eq!(args[0], "-y");
    assert_eq!(value_after(&args, "-vf"), "scale=trunc(iw/2)*2:trunc(ih/2)*2");
}

#[test]
fn begin_rejects_bad_config() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(std::env::temp_dir().join("x.mp4")));
    assert!(
        sink.begin(SinkConfig {
            fps: 0,
            ..cfg()
        })
        .is_err()
    );
    assert!(
        sink.begin(SinkConfig {
            width: 0,
            ..cfg()
        })
        .is_err()
    );

    let mut odd = FfmpegSink::new(
        FfmpegSinkOpts::new(std::env::temp_dir().join("x.mp4")).with_output_height(Some(719)),
    );
    assert!(matches!(
        odd.begin(cfg()).unwrap_err(),
        LoopcamError::Validation(_)
    ));
}

#[test]
fn unwritable_output_is_io_error() {
    // A directory cannot be opened as the output file.
    let dir = std::env::temp_dir().join(format!("loopcam_ffmpeg_dir_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&dir));
    let err = sink.begin(cfg()).unwrap_err();
    assert!(matches!(err, LoopcamError::Io { .. }), "{err}");
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn push_before_begin_is_rejected() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("never.mp4"));
    let f = FrameRgb8::black(64, 48).unwrap();
    assert!(sink.push_frame(FrameIndex(0), &f).is_err());
    assert!(sink.end().is_err());
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("loopcam_ffmpeg_{}_{name}", std::process::id()))
}

fn push_all(sink: &mut FfmpegSink, cfg: &SinkConfig) -> LoopcamResult<()> {
    let frame = FrameRgb8::from_fn(cfg.width, cfg.height, |x, y| {
        [(x * 4) as u8, (y * 5) as u8, 128]
    })?;
    for i in 0..cfg.frame_count {
        sink.push_frame(FrameIndex(i), &frame)?;
    }
    Ok(())
}

#[test]
fn partial_path_is_a_hidden_sibling() {
    let p = partial_path(std::path::Path::new("renders/loop.mp4")).unwrap();
    assert_eq!(p, std::path::PathBuf::from("renders/.loop.mp4.partial"));
    assert!(partial_path(std::path::Path::new("/")).is_err());
}

#[test]
fn existing_output_survives_an_unfinished_render() {
    let out = temp_path("prev.mp4");
    std::fs::write(&out, vec![7u8; 1000]).unwrap();

    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
    // Without ffmpeg `begin` fails; with it the sink is dropped before `end`.
    let _ = sink.begin(cfg());
    drop(sink);

    assert_eq!(std::fs::read(&out).unwrap(), vec![7u8; 1000]);
    assert!(!partial_path(&out).unwrap().exists());
    std::fs::remove_file(&out).unwrap();
}

#[test]
fn fresh_output_is_not_created_by_an_unfinished_render() {
    let out = temp_path("fresh.mp4");
    let _ = std::fs::remove_file(&out);

    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
    let _ = sink.begin(cfg());
    drop(sink);

    assert!(!out.exists());
    assert!(!partial_path(&out).unwrap().exists());
}

#[test]
fn existing_output_is_kept_when_overwrite_is_off() {
    let out = temp_path("keep.mp4");
    std::fs::write(&out, b"old").unwrap();

    let mut opts = FfmpegSinkOpts::new(&out);
    opts.overwrite = false;
    let err = FfmpegSink::new(opts).begin(cfg()).unwrap_err();
    assert!(matches!(err, LoopcamError::Validation(_)), "{err}");
    assert_eq!(std::fs::read(&out).unwrap(), b"old");
    std::fs::remove_file(&out).unwrap();
}

#[test]
fn no_overwrite_encodes_to_a_fresh_path() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let out = temp_path("no_overwrite.mp4");
    let _ = std::fs::remove_file(&out);

    let mut opts = FfmpegSinkOpts::new(&out);
    opts.overwrite = false;
    let cfg = SinkConfig {
        frame_count: 4,
        ..cfg()
    };
    let mut sink = FfmpegSink::new(opts);
    sink.begin(cfg).unwrap();
    push_all(&mut sink, &cfg).unwrap();
    sink.end().unwrap();

    assert!(std::fs::metadata(&out).unwrap().len() > 0);
    assert!(!partial_path(&out).unwrap().exists());
    std::fs::remove_file(&out).unwrap();
}

#[test]
fn ffmpeg_failure_reports_stderr_and_leaves_no_output() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let out = temp_path("bad_preset.mp4");
    let _ = std::fs::remove_file(&out);

    let mut opts = FfmpegSinkOpts::new(&out);
    opts.preset = "no-such-preset".to_string();
    let cfg = SinkConfig {
        frame_count: 4,
        ..cfg()
    };
    let mut sink = FfmpegSink::new(opts);
    sink.begin(cfg).unwrap();
    let err = push_all(&mut sink, &cfg)
        .and_then(|()| sink.end())
        .unwrap_err();

    assert!(matches!(err, LoopcamError::Encode(_)), "{err}");
    assert!(err.to_string().contains("ffmpeg"), "{err}");
    assert!(!out.exists());
    assert!(!partial_path(&out).unwrap().exists());
}
