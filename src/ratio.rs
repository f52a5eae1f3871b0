use std::fmt;

use crate::error::{BadgeError, Result};

/// Width and height of the profile picture area on the badge
pub const PROFILE: Dimensions = Dimensions {
    width: 120,
    height: 128,
};

/// Full-screen splash image
pub const SPLASH: Dimensions = Dimensions {
    width: 246,
    height: 128,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of bytes needed to store one bit per pixel
    pub fn packed_len(&self) -> usize {
        (self.width as usize * self.height as usize) / 8
    }

    /// Reject sizes the bit packer cannot represent.
    ///
    /// Columns are written one byte at a time, so the height has to be a
    /// multiple of 8.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(BadgeError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.height % 8 != 0 {
            return Err(BadgeError::HeightNotByteAligned(self.height));
        }
        Ok(())
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A target size as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ratio {
    Profile,
    Splash,
    Custom(String),
}

impl Ratio {
    pub fn parse(token: &str) -> Self {
        match token {
            "profile" => Ratio::Profile,
            "splash" => Ratio::Splash,
            other => Ratio::Custom(other.to_string()),
        }
    }

    /// Resolve to concrete dimensions.
    ///
    /// With `legacy` set, custom sizes are parsed with [`parse_ratio_legacy`].
    pub fn dimensions(&self, legacy: bool) -> Result<Dimensions> {
        let dimensions = match self {
            Ratio::Profile => PROFILE,
            Ratio::Splash => SPLASH,
            Ratio::Custom(token) => {
                let (width, height) = if legacy {
                    parse_ratio_legacy(token)?
                } else {
                    parse_ratio(token)?
                };
                Dimensions::new(width, height)
            }
        };
        dimensions.validate()?;
        Ok(dimensions)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Profile => f.write_str("profile"),
            Ratio::Splash => f.write_str("splash"),
            Ratio::Custom(token) => f.write_str(token),
        }
    }
}

/// Resolve a preset name or `<W>x<H>` string and validate the result
pub fn resolve_dimensions(token: &str, legacy: bool) -> Result<Dimensions> {
    Ratio::parse(token).dimensions(legacy)
}

fn split_fields(token: &str) -> Result<Vec<String>> {
    let lowered = token.to_lowercase();
    let fields: Vec<String> = lowered.split('x').map(str::to_string).collect();
    if fields.len() != 2 {
        return Err(BadgeError::InvalidRatio(token.to_string()));
    }
    Ok(fields)
}

fn parse_field(axis: &'static str, value: &str) -> Result<u32> {
    value
        .parse::<u32>()
        .map_err(|source| BadgeError::InvalidDimension {
            axis,
            value: value.to_string(),
            source,
        })
}

/// Parse a `<W>x<H>` string (the separator is case-insensitive)
pub fn parse_ratio(token: &str) -> Result<(u32, u32)> {
    let fields = split_fields(token)?;
    let width = parse_field("x", &fields[0])?;
    let height = parse_field("y", &fields[1])?;
    Ok((width, height))
}

/// Parse a `<W>x<H>` string the way older releases did.
///
/// Both dimensions come from the first field, so `64x32` yields `(64, 64)`
/// and the second field is never looked at. Kept for users who generated
/// assets with that behavior and want identical output.
pub fn parse_ratio_legacy(token: &str) -> Result<(u32, u32)> {
    let fields = split_fields(token)?;
    let width = parse_field("x", &fields[0])?;
    let height = parse_field("y", &fields[0])?;
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(resolve_dimensions("profile", false).unwrap(), Dimensions::new(120, 128));
        assert_eq!(resolve_dimensions("splash", false).unwrap(), Dimensions::new(246, 128));
        // Legacy parsing never touches presets
        assert_eq!(resolve_dimensions("splash", true).unwrap(), SPLASH);
    }

    #[test]
    fn test_parse_ratio() {
        assert_eq!(parse_ratio("64x32").unwrap(), (64, 32));
        assert_eq!(parse_ratio("296X128").unwrap(), (296, 128));
    }

    #[test]
    fn test_parse_ratio_legacy_duplicates_first_field() {
        assert_eq!(parse_ratio_legacy("64x32").unwrap(), (64, 64));
        assert_eq!(parse_ratio_legacy("64xabc").unwrap(), (64, 64));
        assert!(parse_ratio_legacy("64").is_err());
    }

    #[test]
    fn test_parse_ratio_invalid() {
        assert!(matches!(parse_ratio("abc"), Err(BadgeError::InvalidRatio(_))));
        assert!(matches!(parse_ratio("64"), Err(BadgeError::InvalidRatio(_))));
        assert!(matches!(parse_ratio("1x2x3"), Err(BadgeError::InvalidRatio(_))));
        assert!(matches!(
            parse_ratio("axb"),
            Err(BadgeError::InvalidDimension { axis: "x", .. })
        ));
        assert!(matches!(
            parse_ratio("64xb"),
            Err(BadgeError::InvalidDimension { axis: "y", .. })
        ));
        assert!(parse_ratio("-8x8").is_err());
    }

    #[test]
    fn test_height_must_be_byte_aligned() {
        assert!(matches!(
            resolve_dimensions("128x127", false),
            Err(BadgeError::HeightNotByteAligned(127))
        ));
        assert!(resolve_dimensions("127x128", false).is_ok());
        // Legacy parsing takes the height from the width field
        assert!(matches!(
            resolve_dimensions("127x128", true),
            Err(BadgeError::HeightNotByteAligned(127))
        ));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            resolve_dimensions("0x8", false),
            Err(BadgeError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn test_packed_len() {
        assert_eq!(PROFILE.packed_len(), 120 * 128 / 8);
        assert_eq!(SPLASH.packed_len(), 3936);
    }
}
