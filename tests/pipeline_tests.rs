//! End-to-end tests for the transient analyzer

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::tempdir;
use transient_analyzer::{
    error::{InputError, OutputError},
    AnalysisResult, AnalyzerError, Config, TransientAnalyzer,
};

/// Write a WAV with short decaying noise bursts at the given times (seconds)
fn write_clicks(path: &Path, sample_rate: u32, channels: u16, seconds: f32, clicks: &[f32]) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let total = (sample_rate as f32 * seconds) as usize;
    let mut frames = vec![0.0f32; total];
    let mut state: u32 = 0xdead_beef;

    for &time in clicks {
        let start = (time * sample_rate as f32) as usize;
        let burst = sample_rate as usize / 20;
        for i in 0..burst {
            if start + i >= total {
                break;
            }
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let noise = (state >> 8) as f32 / (1u32 << 24) as f32 * 2.0 - 1.0;
            let decay = (-(i as f32) / (sample_rate as f32 * 0.005)).exp();
            frames[start + i] = noise * decay * 0.8;
        }
    }

    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for sample in frames {
        for _ in 0..channels {
            writer.write_sample((sample * 32767.0) as i16).unwrap();
        }
    }
    writer.finalize().unwrap();
}

fn read_ana(path: &Path) -> (u32, Vec<u64>) {
    let text = fs::read_to_string(path).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    let sample_rate = header
        .strip_prefix("# sample_rate ")
        .expect("header line")
        .parse()
        .unwrap();
    let onsets = lines.map(|line| line.parse().unwrap()).collect();
    (sample_rate, onsets)
}

fn read_json(path: &Path) -> AnalysisResult {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn analyzer() -> TransientAnalyzer {
    TransientAnalyzer::new(Config::default())
}

#[test]
fn test_text_and_json_agree() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("drums.wav");
    write_clicks(&input, 48_000, 1, 2.0, &[0.25, 0.75, 1.25, 1.75]);

    let paths = analyzer().run(&input, None).unwrap();

    let (ana_rate, ana_onsets) = read_ana(&paths.text);
    let json = read_json(&paths.json);

    assert_eq!(ana_rate, json.sample_rate);
    assert_eq!(ana_onsets.len(), json.onsets.len());
    assert_eq!(ana_onsets.as_slice(), json.onsets.as_slice());
    assert_eq!(ana_onsets.len(), 4, "onsets: {:?}", ana_onsets);
}

#[test]
fn test_onsets_are_non_decreasing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("busy.wav");
    write_clicks(&input, 48_000, 1, 3.0, &[0.1, 0.3, 0.45, 0.9, 1.2, 1.22, 2.0, 2.5, 2.9]);

    let paths = analyzer().run(&input, None).unwrap();
    let (_, onsets) = read_ana(&paths.text);

    assert!(!onsets.is_empty());
    assert!(onsets.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn test_output_rate_is_48k_for_44k_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cd_quality.wav");
    write_clicks(&input, 44_100, 2, 2.0, &[0.5, 1.5]);

    let paths = analyzer().run(&input, None).unwrap();

    let (ana_rate, onsets) = read_ana(&paths.text);
    assert_eq!(ana_rate, 48_000);
    assert_eq!(read_json(&paths.json).sample_rate, 48_000);

    // Offsets are in the 48 kHz domain
    assert_eq!(onsets.len(), 2, "onsets: {:?}", onsets);
    for (&found, expected) in onsets.iter().zip([24_000i64, 72_000]) {
        assert!((found as i64 - expected).abs() <= 1024, "onset {} vs {}", found, expected);
    }
}

#[test]
fn test_unrecognized_extension_is_decoded_by_content() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("clicks.bin");
    write_clicks(&input, 44_100, 2, 2.0, &[0.5, 1.0, 1.5]);

    let paths = analyzer().run(&input, None).unwrap();

    assert_eq!(paths.text, dir.path().join("clicks.ana"));
    let (ana_rate, onsets) = read_ana(&paths.text);
    assert_eq!(ana_rate, 48_000);
    assert_eq!(read_json(&paths.json).onsets.as_slice(), onsets.as_slice());
    assert_eq!(onsets.len(), 3, "onsets: {:?}", onsets);
    for (&found, expected) in onsets.iter().zip([24_000i64, 48_000, 72_000]) {
        assert!((found as i64 - expected).abs() <= 1024, "onset {} vs {}", found, expected);
    }
}

#[test]
fn test_prefix_derived_from_input_name() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("track.wav");
    write_clicks(&input, 48_000, 1, 1.0, &[0.5]);

    let paths = analyzer().run(&input, None).unwrap();

    assert_eq!(paths.text, dir.path().join("track.ana"));
    assert_eq!(paths.json, dir.path().join("track.json"));
    assert!(paths.text.exists());
    assert!(paths.json.exists());
}

#[test]
fn test_explicit_prefix_into_existing_directory() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("track.wav");
    write_clicks(&input, 48_000, 1, 1.0, &[0.5]);
    fs::create_dir(dir.path().join("out")).unwrap();

    let prefix = dir.path().join("out").join("result");
    let paths = analyzer().run(&input, Some(&prefix)).unwrap();

    assert_eq!(paths.text, dir.path().join("out").join("result.ana"));
    assert_eq!(paths.json, dir.path().join("out").join("result.json"));
    assert!(paths.text.exists());
    assert!(paths.json.exists());
    assert!(!dir.path().join("track.ana").exists());
}

#[test]
fn test_explicit_prefix_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("track.wav");
    write_clicks(&input, 48_000, 1, 1.0, &[0.5]);

    let prefix = dir.path().join("out").join("result");
    let err = analyzer().run(&input, Some(&prefix)).unwrap_err();

    assert!(matches!(err, AnalyzerError::Output(OutputError::WriteFailed { .. })));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("loop.wav");
    write_clicks(&input, 44_100, 1, 2.0, &[0.2, 0.7, 1.1, 1.6]);
    let prefix = dir.path().join("loop_onsets");

    let paths = analyzer().run(&input, Some(&prefix)).unwrap();
    let first_text = fs::read(&paths.text).unwrap();
    let first_json = fs::read(&paths.json).unwrap();

    let paths = analyzer().run(&input, Some(&prefix)).unwrap();
    assert_eq!(fs::read(&paths.text).unwrap(), first_text);
    assert_eq!(fs::read(&paths.json).unwrap(), first_json);
}

#[test]
fn test_missing_input_is_fatal_and_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("nope.wav");

    let err = analyzer().run(&input, None).unwrap_err();

    assert!(matches!(err, AnalyzerError::Input(InputError::NotFound { .. })));
    assert!(!dir.path().join("nope.ana").exists());
    assert!(!dir.path().join("nope.json").exists());
}

#[test]
fn test_silent_input_writes_header_only() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("silence.wav");
    write_clicks(&input, 48_000, 1, 1.0, &[]);

    let paths = analyzer().run(&input, None).unwrap();

    assert_eq!(fs::read_to_string(&paths.text).unwrap(), "# sample_rate 48000\n");
    assert_eq!(
        fs::read_to_string(&paths.json).unwrap(),
        "{\n  \"sample_rate\": 48000,\n  \"onsets\": []\n}"
    );
}

fn analyze_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_analyze"))
}

#[test]
fn test_cli_success_prints_both_paths() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cli.wav");
    write_clicks(&input, 48_000, 1, 1.0, &[0.3]);

    let output = analyze_bin().arg(&input).env("RUST_LOG", "off").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let expected: Vec<PathBuf> = vec![dir.path().join("cli.ana"), dir.path().join("cli.json")];
    assert!(stdout.starts_with("Analysis complete"));
    for path in expected {
        assert!(stdout.contains(&path.display().to_string()));
        assert!(path.exists());
    }
}

#[test]
fn test_cli_usage_error_exits_non_zero() {
    let output = analyze_bin().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_missing_input_exits_non_zero() {
    let dir = tempdir().unwrap();
    let output = analyze_bin()
        .arg(dir.path().join("missing.wav"))
        .env("RUST_LOG", "off")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.wav"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_cli_reports_failure_once() {
    let dir = tempdir().unwrap();
    let output = analyze_bin()
        .arg(dir.path().join("missing.wav"))
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Failed to analyze").count(), 1, "stderr: {}", stderr);
    assert!(!stderr.contains("Could not find audio file"), "stderr: {}", stderr);
}

#[test]
fn test_cli_config_changes_target_rate() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("cfg.wav");
    write_clicks(&input, 48_000, 1, 1.0, &[0.5]);
    let config_path = dir.path().join("analyzer.toml");
    fs::write(&config_path, "[audio]\nsample_rate = 22050\n").unwrap();

    let output = analyze_bin()
        .arg("--config")
        .arg(&config_path)
        .arg(&input)
        .env("RUST_LOG", "off")
        .output()
        .unwrap();

    assert!(output.status.success());
    let (rate, _) = read_ana(&dir.path().join("cfg.ana"));
    assert_eq!(rate, 22_050);
}
