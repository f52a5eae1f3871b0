use image::{ImageBuffer, Rgb, RgbImage};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let dir = std::env::temp_dir().join(format!(
        "badgeimg-cli-{}-{}-{}",
        label,
        std::process::id(),
        nanos
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn sample_image(dir: &Path) -> PathBuf {
    let img: RgbImage = ImageBuffer::from_fn(32, 32, |x, y| {
        if (x / 4 + y / 4) % 2 == 0 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    });
    let path = dir.join("sample.png");
    img.save(&path).unwrap();
    path
}

fn badgeimg(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_badgeimg"))
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap()
}

fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[test]
fn go_style_flags_write_bin_file() {
    let dir = unique_temp_dir("bin");
    sample_image(&dir);

    let output = badgeimg(&dir, &["-outmode", "bin", "-ratio", "splash", "sample.png"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stdout.is_empty());

    let bytes = std::fs::read(dir.join("splash.bin")).unwrap();
    assert_eq!(bytes.len(), 246 * 128 / 8);
}

#[test]
fn base64_stdout_is_pipeable_with_preview() {
    let dir = unique_temp_dir("base64");
    sample_image(&dir);

    let output = badgeimg(
        &dir,
        &["--outmode", "base64", "--ratio", "16x16", "--show", "--disable-dithering", "sample.png"],
    );
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    // 16x16 pixels pack into 32 bytes, 44 base64 characters
    assert_eq!(stdout.trim_end().len(), 44);

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stderr.lines().count(), 16);
    assert!(stderr.contains('*'));
}

#[test]
fn odd_height_exits_before_any_output() {
    let dir = unique_temp_dir("odd");
    sample_image(&dir);

    let output = badgeimg(&dir, &["--outmode", "bin", "--ratio", "128x127", "sample.png"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("divisible by 8"));
    assert_eq!(file_count(&dir), 1);
}

#[test]
fn height_check_happens_before_decoding() {
    let dir = unique_temp_dir("odd-missing");
    let output = badgeimg(&dir, &["--outmode", "bin", "--ratio", "8x7", "missing.png"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("divisible by 8"));
    assert!(!stderr.contains("could not stat"));
}

#[test]
fn unknown_outmode_exits_with_one() {
    let dir = unique_temp_dir("outmode");
    sample_image(&dir);

    let output = badgeimg(&dir, &["--outmode", "png", "--ratio", "profile", "sample.png"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(file_count(&dir), 1);
}

#[test]
fn malformed_ratio_exits_with_one() {
    let dir = unique_temp_dir("ratio");
    sample_image(&dir);

    for ratio in ["abc", "64", "64xb"] {
        let output = badgeimg(&dir, &["--outmode", "bin", "--ratio", ratio, "sample.png"]);
        assert_eq!(output.status.code(), Some(1), "ratio {}", ratio);
    }
    assert_eq!(file_count(&dir), 1);
}

#[test]
fn missing_arguments_exit_with_one() {
    let dir = unique_temp_dir("usage");
    sample_image(&dir);

    assert_eq!(badgeimg(&dir, &[]).status.code(), Some(1));
    assert_eq!(badgeimg(&dir, &["--outmode", "bin", "sample.png"]).status.code(), Some(1));
    assert_eq!(badgeimg(&dir, &["--ratio", "profile", "sample.png"]).status.code(), Some(1));
}

#[test]
fn missing_input_exits_with_one() {
    let dir = unique_temp_dir("missing");
    let output = badgeimg(&dir, &["--outmode", "bin", "--ratio", "profile", "nope.png"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("could not stat"));
}

#[test]
fn config_file_supplies_defaults() {
    let dir = unique_temp_dir("config");
    sample_image(&dir);
    std::fs::write(
        dir.join("badge.json"),
        r#"{ "ratio": "profile", "outmode": "rice", "sourceLang": "c", "outputDir": "generated" }"#,
    )
    .unwrap();

    let output = badgeimg(&dir, &["--config", "badge.json", "sample.png"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let header = std::fs::read_to_string(dir.join("generated/profile-generated.h")).unwrap();
    assert!(header.contains("const unsigned char RPROFILE[1920] = {"));
}

#[test]
fn help_exits_with_zero() {
    let dir = unique_temp_dir("help");
    let output = badgeimg(&dir, &["-help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("--outmode"));
}
