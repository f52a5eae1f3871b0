use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use console::style;
use std::io;
use std::process::ExitCode;
use std::time::Instant;

use badgeimg::cli::{normalize_flags, Args};
use badgeimg::utils::{
    error_println, format_duration, has_supported_extension, verbose_println, warn_println,
};
use badgeimg::{BadgeError, ProcessingEngine};

fn main() -> ExitCode {
    let args = match Args::try_parse_from(normalize_flags(std::env::args_os())) {
        Ok(args) => args,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error_println(&format!("{:#}", e));
            if e.downcast_ref::<BadgeError>().is_some_and(BadgeError::is_usage) {
                eprintln!();
                eprintln!("{}", Args::command().render_usage());
                eprintln!("For more information, try '--help'.");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(mut args: Args) -> Result<()> {
    let start_time = Instant::now();

    args.load_and_merge_config()?;

    // Ratio and outmode are validated before the image is touched
    let config = args.to_processing_config()?;

    if config.verbose {
        eprintln!("{}", style("Configuration:").bold());
        eprintln!("  Input: {}", args.input.display());
        eprintln!("  Ratio: {} ({})", config.ratio, config.dimensions);
        eprintln!("  Output mode: {:?}", config.out_mode);
        eprintln!(
            "  Dithering: {}",
            if config.dithering {
                "Floyd-Steinberg"
            } else {
                "disabled"
            }
        );
        eprintln!("  Preview: {}", config.show);
        eprintln!("  Output directory: {}", config.output_dir.display());
        eprintln!();
    }

    if !has_supported_extension(&args.input) {
        warn_println(&format!(
            "{} does not look like a PNG, JPEG, BMP or WebP file; trying anyway",
            args.input.display()
        ));
    }

    let engine = ProcessingEngine::new(config);
    let stdout = io::stdout();
    let stderr = io::stderr();
    let result = engine
        .run(&args.input, &mut stdout.lock(), &mut stderr.lock())
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    verbose_println(
        engine.config().verbose,
        &format!(
            "Done: {} bytes{} in {}",
            result.bitmap.len(),
            result
                .output_path
                .as_ref()
                .map(|p| format!(" written to {}", p.display()))
                .unwrap_or_default(),
            format_duration(start_time.elapsed())
        ),
    );

    Ok(())
}
