//! Integration tests for the `lento` binary.

use lento_io::{WavSpec, read_wav_info, read_wav_stereo, write_wav};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn lento_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lento"))
}

fn run(args: &[&str]) -> Output {
    lento_bin().args(args).output().expect("failed to run lento")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "lento failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// One second of a 220 Hz sine, mono.
fn write_tone(path: &Path, sample_rate: u32) {
    let samples: Vec<f32> = (0..sample_rate)
        .map(|i| (2.0 * std::f32::consts::PI * 220.0 * i as f32 / sample_rate as f32).sin() * 0.5)
        .collect();
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
    };
    write_wav(path, &samples, spec).unwrap();
}

/// Frames left after slowing `frames` down to `speed`.
fn slowed_len(frames: u32, speed: f32) -> u64 {
    (f64::from(frames) / f64::from(speed)).floor() as u64
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn cli_help_lists_commands() {
    let output = run(&["--help"]);
    assert_success(&output);
    let text = stdout(&output);
    for command in ["impulse", "shift", "render", "params", "presets", "analyze"] {
        assert!(text.contains(command), "help should mention '{command}'");
    }
}

#[test]
fn cli_version_works() {
    let output = run(&["--version"]);
    assert_success(&output);
    assert!(stdout(&output).contains("lento"));
}

#[test]
fn cli_impulse_writes_hall() {
    let dir = TempDir::new().unwrap();
    let ir_path = dir.path().join("hall.wav");

    let output = run(&[
        "impulse",
        path_str(&ir_path),
        "--duration",
        "3",
        "--sample-rate",
        "8000",
    ]);
    assert_success(&output);

    let info = read_wav_info(&ir_path).unwrap();
    assert_eq!(info.spec.channels, 2);
    assert_eq!(info.spec.sample_rate, 8000);
    assert_eq!(info.frames, 24000);
}

#[test]
fn cli_impulse_noise_is_reproducible_with_seed() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.wav");
    let b = dir.path().join("b.wav");

    for path in [&a, &b] {
        let output = run(&[
            "impulse",
            path_str(path),
            "--algorithm",
            "noise",
            "--sample-rate",
            "8000",
            "--seed",
            "42",
        ]);
        assert_success(&output);
    }

    let (first, _) = read_wav_stereo(&a).unwrap();
    let (second, _) = read_wav_stereo(&b).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 16000);
}

#[test]
fn cli_impulse_clamps_duration() {
    let dir = TempDir::new().unwrap();
    let ir_path = dir.path().join("long.wav");
    let output = run(&[
        "impulse",
        path_str(&ir_path),
        "--duration",
        "30",
        "--sample-rate",
        "8000",
    ]);
    assert_success(&output);
    assert_eq!(read_wav_info(&ir_path).unwrap().frames, 48000);
}

#[test]
fn cli_impulse_rejects_unknown_algorithm() {
    let dir = TempDir::new().unwrap();
    let output = run(&[
        "impulse",
        path_str(&dir.path().join("x.wav")),
        "--algorithm",
        "plate",
    ]);
    assert!(!output.status.success());
}

#[test]
fn cli_shift_keeps_length() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let out = dir.path().join("out.wav");
    write_tone(&input, 16000);

    let output = run(&[
        "shift",
        path_str(&input),
        path_str(&out),
        "--pitch",
        "1.5",
        "--grain-size",
        "1024",
    ]);
    assert_success(&output);

    let (shifted, spec) = read_wav_stereo(&out).unwrap();
    assert_eq!(spec.sample_rate, 16000);
    assert_eq!(shifted.len(), 16000);
    assert!(shifted.peak() > 0.1);
}

#[test]
fn cli_shift_rejects_bad_grain_size() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    write_tone(&input, 8000);

    let output = run(&[
        "shift",
        path_str(&input),
        path_str(&dir.path().join("out.wav")),
        "--pitch",
        "1.2",
        "--grain-size",
        "100",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("grain size"));
}

#[test]
fn cli_render_slowed_reverb() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let out = dir.path().join("out.wav");
    write_tone(&input, 8000);

    let output = run(&[
        "render",
        path_str(&input),
        path_str(&out),
        "--preset",
        "slowed_reverb",
    ]);
    assert_success(&output);
    assert!(stdout(&output).contains("0.85x"));

    // Slowed tone plus a 4 s hall tail
    let info = read_wav_info(&out).unwrap();
    assert_eq!(info.frames, slowed_len(8000, 0.85) + 4 * 8000 - 1);
}

#[test]
fn cli_render_dry_keeps_length() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let out = dir.path().join("out.wav");
    write_tone(&input, 8000);

    let output = run(&[
        "render",
        path_str(&input),
        path_str(&out),
        "--speed",
        "0.8",
        "--reverb",
        "0",
        "--bass",
        "50",
        "--pitch-correction",
    ]);
    assert_success(&output);
    assert_eq!(read_wav_info(&out).unwrap().frames, slowed_len(8000, 0.8));
}

#[test]
fn cli_render_off_copies_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let out = dir.path().join("out.wav");
    write_tone(&input, 8000);

    let output = run(&["render", path_str(&input), path_str(&out), "--preset", "off"]);
    assert_success(&output);

    let (original, _) = read_wav_stereo(&input).unwrap();
    let (copied, _) = read_wav_stereo(&out).unwrap();
    assert_eq!(original, copied);
}

#[test]
fn cli_render_with_exported_settings() {
    let dir = TempDir::new().unwrap();
    let settings = dir.path().join("daycore.toml");
    let input = dir.path().join("in.wav");
    let out = dir.path().join("out.wav");
    write_tone(&input, 8000);

    assert_success(&run(&["presets", "export", "daycore", path_str(&settings)]));
    assert!(settings.exists());

    let output = run(&[
        "render",
        path_str(&input),
        path_str(&out),
        "--settings",
        path_str(&settings),
        "--reverb",
        "0",
    ]);
    assert_success(&output);
    // Daycore runs at 0.8x
    assert_eq!(read_wav_info(&out).unwrap().frames, slowed_len(8000, 0.8));
}

#[test]
fn cli_params_maps_controls() {
    let output = run(&[
        "params",
        "--speed",
        "0.8",
        "--reverb",
        "100",
        "--bass",
        "50",
        "--profile",
        "enhanced",
        "--pitch-correction",
        "--json",
    ]);
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.contains("\"speed\": \"0.80x\""), "got: {text}");
    assert!(text.contains("\"shelf_gain_db\": 6.0"), "got: {text}");
    assert!(text.contains("\"pitch_factor\": 1.25"), "got: {text}");
    assert!(text.contains("\"dry\": 0.75"), "got: {text}");
}

#[test]
fn cli_params_table() {
    let output = run(&["params", "--preset", "nightcore"]);
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.contains("1.25x"));
    assert!(text.contains("nightcore"));
}

#[test]
fn cli_presets_list_and_show() {
    let output = run(&["presets", "list"]);
    assert_success(&output);
    let text = stdout(&output);
    for id in ["off", "slowed_reverb", "daycore", "nightcore", "vaporwave", "bass_boosted"] {
        assert!(text.contains(id), "list should contain '{id}'");
    }

    let output = run(&["presets", "show", "vaporwave"]);
    assert_success(&output);
    assert!(stdout(&output).contains("Vaporwave"));

    let output = run(&["presets", "show", "vaporwave", "--toml"]);
    assert_success(&output);
    assert!(stdout(&output).contains("speed = 0.75"));
}

#[test]
fn cli_presets_unknown_fails() {
    let output = run(&["presets", "show", "chipmunk"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown preset"));
}

#[test]
fn cli_analyze_reports_rt60() {
    let dir = TempDir::new().unwrap();
    let ir_path = dir.path().join("hall.wav");
    assert_success(&run(&[
        "impulse",
        path_str(&ir_path),
        "--sample-rate",
        "8000",
    ]));

    let output = run(&["analyze", path_str(&ir_path), "--json", "--bands"]);
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.contains("\"rt60_seconds\""));
    assert!(text.contains("\"band_peak_db\""));
    assert!(text.contains("\"samples\": 32000"));
}

#[test]
fn cli_missing_input_fails() {
    let output = run(&["render", "/no/such/file.wav", "/tmp/never.wav"]);
    assert!(!output.status.success());
}
