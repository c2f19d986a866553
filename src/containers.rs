use std::fmt::Display;
use std::str::FromStr;

use crate::codecs::Codec;
use crate::error::CompressorError;

/// Output formats a batch can produce.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Container {
    #[default]
    MP4,
    Matroska,
    WebM,
}

impl Container {
    pub const NAMES: [&'static str; 3] = ["mp4", "mkv", "webm"];

    pub fn extension(container: Container) -> &'static str {
        match container {
            Container::MP4 => "mp4",
            Container::Matroska => "mkv",
            Container::WebM => "webm",
        }
    }

    pub fn codec(container: Container) -> Codec {
        match container {
            Container::MP4 | Container::Matroska => Codec::H264,
            Container::WebM => Codec::VP9,
        }
    }

    /// Video codec arguments for this format at the given CRF.
    pub fn parameters(container: Container, crf: u8) -> Vec<String> {
        Codec::parameters(Container::codec(container), crf)
    }
}

impl FromStr for Container {
    type Err = CompressorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mp4" => Ok(Container::MP4),
            "mkv" | "matroska" => Ok(Container::Matroska),
            "webm" => Ok(Container::WebM),
            _ => Err(CompressorError::invalid_setting("format", s, &Container::NAMES)),
        }
    }
}

impl Display for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Container::extension(*self))
    }
}
