use std::fmt::Display;

use crate::error::CompressorError;

pub const MIN_CRF: i64 = 0;
pub const MAX_CRF: i64 = 51;

/// Quality selector. The named presets map to fixed CRF levels; `Custom`
/// carries the user's text untouched until the batch is validated.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Quality {
    High,
    #[default]
    Medium,
    Low,
    Custom(String),
}

impl Quality {
    pub const NAMES: [&'static str; 4] = ["high", "medium", "low", "custom"];

    /// Resolves a preset name; `custom` takes its value from `custom_crf`.
    pub fn from_preset(name: &str, custom_crf: Option<&str>) -> Result<Self, CompressorError> {
        match name.trim().to_lowercase().as_str() {
            "high" => Ok(Quality::High),
            "medium" => Ok(Quality::Medium),
            "low" => Ok(Quality::Low),
            "custom" => Ok(Quality::Custom(String::from(custom_crf.unwrap_or("")))),
            _ => Err(CompressorError::invalid_setting("quality", name, &Quality::NAMES)),
        }
    }

    /// The CRF for this selector, or `InvalidQuality` for a custom value
    /// that is not an integer in 0..=51.
    pub fn crf(&self) -> Result<u8, CompressorError> {
        match self {
            Quality::High => Ok(18),
            Quality::Medium => Ok(23),
            Quality::Low => Ok(28),
            Quality::Custom(value) => parse_crf(value),
        }
    }
}

pub fn parse_crf(value: &str) -> Result<u8, CompressorError> {
    match value.trim().parse::<i64>() {
        Ok(crf) if (MIN_CRF..=MAX_CRF).contains(&crf) => Ok(crf as u8),
        _ => Err(CompressorError::InvalidQuality(String::from(value))),
    }
}

impl Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quality::High => write!(f, "high"),
            Quality::Medium => write!(f, "medium"),
            Quality::Low => write!(f, "low"),
            Quality::Custom(value) => write!(f, "custom ({})", value),
        }
    }
}
