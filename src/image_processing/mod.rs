pub mod bitmap;
pub mod dithering;
pub mod preview;
pub mod resize;

use image::{DynamicImage, ImageReader};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::{OutMode, SourceLang};
use crate::error::{BadgeError, Result};
use crate::output;
use crate::ratio::{Dimensions, Ratio};
use crate::utils::verbose_println;

pub use bitmap::Bitmap;

/// Everything one conversion needs, resolved up front and never mutated
#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub ratio: Ratio,
    pub dimensions: Dimensions,
    pub dithering: bool,
    pub out_mode: OutMode,
    pub show: bool,
    pub output_dir: PathBuf,
    pub source_lang: SourceLang,
    pub var_name: Option<String>,
    pub verbose: bool,
}

#[derive(Debug)]
pub struct ProcessingResult {
    pub bitmap: Bitmap,
    /// File written by the `rice` and `bin` modes
    pub output_path: Option<PathBuf>,
}

pub struct ProcessingEngine {
    config: ProcessingConfig,
}

impl ProcessingEngine {
    pub fn new(config: ProcessingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// Decode an image file, sniffing the format from its contents
    pub fn load_image(&self, input_path: &Path) -> Result<DynamicImage> {
        std::fs::metadata(input_path).map_err(|source| BadgeError::InputNotFound {
            path: input_path.to_path_buf(),
            source,
        })?;

        verbose_println(
            self.config.verbose,
            &format!("Loading: {}", input_path.display()),
        );

        let decode_err = |source: image::ImageError| BadgeError::Decode {
            path: input_path.to_path_buf(),
            source,
        };

        let img = ImageReader::open(input_path)
            .map_err(|source| BadgeError::InputNotFound {
                path: input_path.to_path_buf(),
                source,
            })?
            .with_guessed_format()
            .map_err(|e| decode_err(image::ImageError::IoError(e)))?
            .decode()
            .map_err(decode_err)?;

        verbose_println(
            self.config.verbose,
            &format!("Decoded {}x{} source image", img.width(), img.height()),
        );

        Ok(img)
    }

    /// Resize, optionally dither, and pack a decoded image
    pub fn convert(&self, img: &DynamicImage) -> Result<Bitmap> {
        let Dimensions { width, height } = self.config.dimensions;

        let mut resized = resize::resize_nearest(img, width, height)?;
        verbose_println(
            self.config.verbose,
            &format!("Resized to {}x{} (nearest neighbor)", width, height),
        );

        if self.config.dithering {
            resized = dithering::floyd_steinberg_bw(&resized);
            verbose_println(self.config.verbose, "Applied Floyd-Steinberg dithering");
        } else {
            verbose_println(
                self.config.verbose,
                "Dithering disabled: only pure black pixels are set",
            );
        }

        let bitmap = Bitmap::pack(&resized)?;
        verbose_println(
            self.config.verbose,
            &format!(
                "Packed {} bytes, {} of {} pixels set",
                bitmap.len(),
                bitmap.black_pixel_count(),
                width * height
            ),
        );

        Ok(bitmap)
    }

    /// Run the whole pipeline for one input file.
    ///
    /// `stdout` receives the base64 text, `diagnostics` the optional preview.
    pub fn run<O: Write, D: Write>(
        &self,
        input_path: &Path,
        stdout: &mut O,
        diagnostics: &mut D,
    ) -> Result<ProcessingResult> {
        let img = self.load_image(input_path)?;
        let bitmap = self.convert(&img)?;
        drop(img);

        let output_path = output::emit(&bitmap, &self.config, stdout)?;
        if let Some(path) = &output_path {
            verbose_println(self.config.verbose, &format!("Wrote {}", path.display()));
        }

        if self.config.show {
            preview::write_preview(diagnostics, &bitmap)
                .map_err(|source| BadgeError::io("<stderr>", source))?;
        }

        Ok(ProcessingResult {
            bitmap,
            output_path,
        })
    }
}
