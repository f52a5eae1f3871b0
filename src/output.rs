//! Output emitters for the packed bitmap.

use base64::{engine::general_purpose, Engine as _};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::{OutMode, SourceLang};
use crate::error::{BadgeError, Result};
use crate::image_processing::{Bitmap, ProcessingConfig};
use crate::ratio::Ratio;

/// Array entries per line in generated source files
pub const BYTES_PER_LINE: usize = 32;

const GENERATOR: &str = env!("CARGO_PKG_NAME");

/// Emit `bitmap` according to the configured output mode.
///
/// Returns the path of the written file for the file-based modes.
pub fn emit<W: Write>(
    bitmap: &Bitmap,
    config: &ProcessingConfig,
    stdout: &mut W,
) -> Result<Option<PathBuf>> {
    match config.out_mode {
        OutMode::Rice => {
            let path = config
                .output_dir
                .join(source_file_name(&config.ratio, config.source_lang));
            let var_name = config
                .var_name
                .clone()
                .unwrap_or_else(|| default_var_name(&config.ratio, config.source_lang));
            let source = generate_source(bitmap, &var_name, config.source_lang, GENERATOR);
            write_file(&path, source.as_bytes())?;
            Ok(Some(path))
        }
        OutMode::Bin => {
            let path = config.output_dir.join(bin_file_name(&config.ratio));
            write_file(&path, bitmap.as_bytes())?;
            Ok(Some(path))
        }
        OutMode::Base64 => {
            writeln!(stdout, "{}", encode_base64(bitmap.as_bytes()))
                .and_then(|_| stdout.flush())
                .map_err(|source| BadgeError::io("<stdout>", source))?;
            Ok(None)
        }
        OutMode::None => Ok(None),
    }
}

/// `<ratio>-generated.<ext>`
pub fn source_file_name(ratio: &Ratio, lang: SourceLang) -> String {
    format!("{}-generated.{}", ratio, lang.extension())
}

/// `<ratio>.bin`
pub fn bin_file_name(ratio: &Ratio) -> String {
    format!("{}.bin", ratio)
}

/// Array name derived from the ratio: `rsplash` for Go, `RSPLASH` for Rust and C
pub fn default_var_name(ratio: &Ratio, lang: SourceLang) -> String {
    let name = sanitize_identifier(&format!("r{}", ratio));
    match lang {
        SourceLang::Go => name,
        SourceLang::Rust | SourceLang::C => name.to_uppercase(),
    }
}

fn sanitize_identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Format bytes as `0xAB,` entries, `BYTES_PER_LINE` to a line
fn format_byte_lines(data: &[u8], indent: &str) -> String {
    data.chunks(BYTES_PER_LINE)
        .map(|chunk| {
            let entries: Vec<String> = chunk.iter().map(|b| format!("0x{:02X},", b)).collect();
            format!("{}{}", indent, entries.join(" "))
        })
        .collect::<Vec<String>>()
        .join("\n")
}

/// Render a source file that defines the bitmap as a byte-array literal
pub fn generate_source(bitmap: &Bitmap, var_name: &str, lang: SourceLang, generator: &str) -> String {
    let data = bitmap.as_bytes();
    let dims = bitmap.dimensions();

    match lang {
        SourceLang::Rust => format!(
            "// Code generated by {generator} DO NOT EDIT.\n\
             // {dims} pixels, 1 bit per pixel, column-major, MSB first.\n\
             \n\
             pub static {var_name}: [u8; {size}] = [\n\
             {lines}\n\
             ];\n",
            size = data.len(),
            lines = format_byte_lines(data, "    "),
        ),
        SourceLang::Go => format!(
            "// Code generated by {generator} DO NOT EDIT.\n\
             \n\
             package main\n\
             \n\
             var {var_name} = []byte{{\n\
             {lines}\n\
             }}\n",
            lines = format_byte_lines(data, "\t"),
        ),
        SourceLang::C => {
            let header_guard = format!("_{}_H_", var_name.to_uppercase());
            format!(
                "// Code generated by {generator} DO NOT EDIT.\n\
                 // Image dimensions: {dims} pixels, 1 bit per pixel, column-major, MSB first.\n\
                 \n\
                 #ifndef {header_guard}\n\
                 #define {header_guard}\n\
                 \n\
                 const unsigned char {var_name}[{size}] = {{\n\
                 {lines}\n\
                 }};\n\
                 \n\
                 #endif\n",
                size = data.len(),
                lines = format_byte_lines(data, "    "),
            )
        }
    }
}

pub fn encode_base64(data: &[u8]) -> String {
    general_purpose::STANDARD.encode(data)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| BadgeError::io(parent, source))?;
        }
    }
    fs::write(path, contents).map_err(|source| BadgeError::io(path, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_byte_bitmap() -> Bitmap {
        Bitmap::from_raw(2, 8, vec![0x00, 0xFF]).unwrap()
    }

    #[test]
    fn test_generate_rust_source() {
        let source = generate_source(&two_byte_bitmap(), "RPROFILE", SourceLang::Rust, "badgeimg");
        assert!(source.starts_with("// Code generated by badgeimg DO NOT EDIT.\n"));
        assert!(source.contains("pub static RPROFILE: [u8; 2] = [\n"));
        assert!(source.contains("\n    0x00, 0xFF,\n"));
        assert!(source.ends_with("];\n"));
    }

    #[test]
    fn test_generate_go_source() {
        let source = generate_source(&two_byte_bitmap(), "rprofile", SourceLang::Go, "badgeimg");
        assert!(source.contains("package main\n"));
        assert!(source.contains("var rprofile = []byte{\n\t0x00, 0xFF,\n}\n"));
    }

    #[test]
    fn test_generate_c_header() {
        let source = generate_source(&two_byte_bitmap(), "RSPLASH", SourceLang::C, "badgeimg");
        assert!(source.contains("#ifndef _RSPLASH_H_"));
        assert!(source.contains("const unsigned char RSPLASH[2] = {"));
        assert!(source.contains("\n    0x00, 0xFF,\n"));
        assert!(source.contains("Image dimensions: 2x8"));
    }

    #[test]
    fn test_thirty_two_entries_per_line() {
        let bitmap = Bitmap::from_raw(40, 8, (0u8..40).collect()).unwrap();
        let source = generate_source(&bitmap, "R40X8", SourceLang::Rust, "badgeimg");
        let data_lines: Vec<&str> = source.lines().filter(|l| l.starts_with("    0x")).collect();
        assert_eq!(data_lines.len(), 2);
        assert_eq!(data_lines[0].matches("0x").count(), 32);
        assert_eq!(data_lines[1].matches("0x").count(), 8);
        assert!(data_lines[1].starts_with("    0x20, 0x21,"));
    }

    #[test]
    fn test_file_names() {
        assert_eq!(source_file_name(&Ratio::Splash, SourceLang::Go), "splash-generated.go");
        assert_eq!(
            source_file_name(&Ratio::parse("128x64"), SourceLang::Rust),
            "128x64-generated.rs"
        );
        assert_eq!(bin_file_name(&Ratio::Profile), "profile.bin");
    }

    #[test]
    fn test_default_var_name() {
        assert_eq!(default_var_name(&Ratio::Profile, SourceLang::Go), "rprofile");
        assert_eq!(default_var_name(&Ratio::Profile, SourceLang::Rust), "RPROFILE");
        assert_eq!(default_var_name(&Ratio::parse("64x32"), SourceLang::C), "R64X32");
        assert_eq!(sanitize_identifier("a-b.c"), "a_b_c");
        assert_eq!(sanitize_identifier("9lives"), "_9lives");
    }

    #[test]
    fn test_encode_base64() {
        assert_eq!(encode_base64(&[0x00, 0xFF]), "AP8=");
        assert_eq!(encode_base64(&[]), "");
    }
}
