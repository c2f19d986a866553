use std::fmt::Display;
use std::str::FromStr;

use crate::error::CompressorError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Output resolution choices. `Original` leaves the video unscaled.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ResolutionPreset {
    #[default]
    Original,
    UHD,
    FullHD,
    HD,
    SD,
}

impl ResolutionPreset {
    pub const NAMES: [&'static str; 5] = ["original", "4k", "1080p", "720p", "480p"];

    pub fn resolution(&self) -> Option<Resolution> {
        let (width, height) = match self {
            ResolutionPreset::Original => return None,
            ResolutionPreset::UHD => (3840, 2160),
            ResolutionPreset::FullHD => (1920, 1080),
            ResolutionPreset::HD => (1280, 720),
            ResolutionPreset::SD => (854, 480),
        };
        Some(Resolution { width, height })
    }

    /// `-vf scale=WxH`, or nothing for `Original`.
    pub fn parameters(&self) -> Vec<String> {
        match self.resolution() {
            Some(res) => vec![String::from("-vf"), format!("scale={}", res)],
            None => vec![],
        }
    }
}

impl FromStr for ResolutionPreset {
    type Err = CompressorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "original" => Ok(ResolutionPreset::Original),
            "4k" | "2160p" => Ok(ResolutionPreset::UHD),
            "1080p" => Ok(ResolutionPreset::FullHD),
            "720p" => Ok(ResolutionPreset::HD),
            "480p" => Ok(ResolutionPreset::SD),
            _ => Err(CompressorError::invalid_setting("resolution", s, &ResolutionPreset::NAMES)),
        }
    }
}

impl Display for ResolutionPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.resolution() {
            None => write!(f, "original"),
            Some(res) => write!(f, "{}", res),
        }
    }
}
