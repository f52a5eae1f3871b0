use clap::{CommandFactory, Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{BadgeError, Result};
use crate::image_processing::ProcessingConfig;
use crate::ratio::Ratio;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutMode {
    /// Source file with the bitmap as a byte-array literal (<ratio>-generated.<ext>)
    #[value(name = "rice")]
    Rice,
    /// Raw bitmap bytes (<ratio>.bin)
    #[value(name = "bin")]
    Bin,
    /// Standard base64 of the bitmap, printed to stdout
    #[value(name = "base64")]
    Base64,
    /// No output; combine with --show to preview only
    #[value(name = "none")]
    None,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum SourceLang {
    /// `pub static NAME: [u8; N]`
    #[default]
    #[value(name = "rust")]
    Rust,
    /// `var name = []byte{...}` in package main
    #[value(name = "go")]
    Go,
    /// `const unsigned char NAME[N]` header with include guard
    #[value(name = "c")]
    C,
}

impl SourceLang {
    pub fn extension(&self) -> &'static str {
        match self {
            SourceLang::Rust => "rs",
            SourceLang::Go => "go",
            SourceLang::C => "h",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "badgeimg",
    version,
    about = "Convert images into 1-bit bitmaps for monochrome badge displays",
    long_about = "
Badge Image Converter

Resizes an image to the badge display size (nearest neighbor), optionally dithers it
to black & white with Floyd-Steinberg, and packs it one bit per pixel in the display's
column-major scan order.

Output modes:
  rice    write <ratio>-generated.<ext> containing a byte-array literal
  bin     write <ratio>.bin with the raw bitmap bytes
  base64  print the bitmap as base64 on stdout
  none    write nothing (useful with --show)

The ASCII preview (--show) and all diagnostics go to stderr, so base64 output
can be piped. Single-dash long flags (-outmode bin, -ratio=splash) are accepted.",
    after_help = "Examples:
  badgeimg --outmode bin --ratio splash tainigo_128.png
  badgeimg --outmode rice --ratio 128x128 --disable-dithering --show image.jpg
  badgeimg -outmode base64 -ratio profile avatar.png | pbcopy"
)]
pub struct Args {
    /// Input image (PNG, JPEG, BMP or WebP)
    #[arg(value_name = "INPUT_IMAGE")]
    pub input: PathBuf,

    /// Disable Floyd-Steinberg dithering (for images that are already black & white)
    #[arg(long = "disable-dithering")]
    pub disable_dithering: bool,

    /// Output mode
    #[arg(long = "outmode", value_name = "MODE")]
    pub outmode: Option<OutMode>,

    /// Target size: 'profile' (120x128), 'splash' (246x128) or <width>x<height>
    #[arg(long = "ratio", value_name = "RATIO")]
    pub ratio: Option<String>,

    /// Paint dot-matrix style art of the result to stderr
    #[arg(long = "show")]
    pub show: bool,

    /// Parse <width>x<height> like older releases did (height taken from the width field)
    #[arg(long = "legacy-ratio")]
    pub legacy_ratio: bool,

    /// Language of the file generated by the rice output mode [default: rust]
    #[arg(long = "source-lang", value_name = "LANG")]
    pub source_lang: Option<SourceLang>,

    /// Name of the generated array (default derived from the ratio)
    #[arg(long = "var-name", value_name = "IDENT")]
    pub var_name: Option<String>,

    /// Directory for generated files [default: .]
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// JSON file with default settings; command-line values take precedence
    #[arg(long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Print progress details to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    /// Resolve the merged arguments into an immutable pipeline configuration.
    ///
    /// Ratio validation happens here, before any image is decoded.
    pub fn to_processing_config(&self) -> Result<ProcessingConfig> {
        let out_mode = self.outmode.ok_or(BadgeError::MissingArgument("outmode"))?;
        let ratio_token = self
            .ratio
            .as_deref()
            .filter(|r| !r.is_empty())
            .ok_or(BadgeError::MissingArgument("ratio"))?;

        let ratio = Ratio::parse(ratio_token);
        let dimensions = ratio.dimensions(self.legacy_ratio)?;

        Ok(ProcessingConfig {
            ratio,
            dimensions,
            dithering: !self.disable_dithering,
            out_mode,
            show: self.show,
            output_dir: self.output_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
            source_lang: self.source_lang.unwrap_or_default(),
            var_name: self.var_name.clone(),
            verbose: self.verbose,
        })
    }
}

/// Rewrite Go-style single-dash long flags (`-outmode`, `-ratio=splash`) to
/// their `--` form so clap accepts them. Short flags and anything after a
/// bare `--` are left alone.
pub fn normalize_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let command = Args::command();
    let mut long_names: Vec<String> = command
        .get_arguments()
        .filter_map(|arg| arg.get_long().map(str::to_string))
        .collect();
    long_names.push("help".to_string());
    long_names.push("version".to_string());

    let mut normalized = Vec::new();
    let mut passthrough = false;

    for (index, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if index == 0 || passthrough {
            normalized.push(arg);
            continue;
        }

        let rewritten = arg.to_str().and_then(|s| {
            if s == "--" {
                return None;
            }
            let name = s.strip_prefix('-')?;
            if name.starts_with('-') {
                return None;
            }
            let flag = name.split('=').next().unwrap_or(name);
            long_names
                .iter()
                .any(|long| long == flag)
                .then(|| OsString::from(format!("-{}", s)))
        });

        if arg == "--" {
            passthrough = true;
        }
        normalized.push(rewritten.unwrap_or(arg));
    }

    normalized
}
