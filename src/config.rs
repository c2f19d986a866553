use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::containers::Container;
use crate::error::CompressorError;
use crate::quality::Quality;
use crate::resolution::ResolutionPreset;
use crate::settings::JobSettings;

/// Defaults for everything the command line can set, read from an optional
/// JSON file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    pub format: String,
    pub quality: Option<String>,
    pub crf: Option<String>,
    pub resolution: String,
    pub poll_interval_ms: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            format: String::from("mp4"),
            quality: None,
            crf: None,
            resolution: String::from("original"),
            poll_interval_ms: 100,
            log_level: String::from("warn"),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, CompressorError> {
        let text = fs::read_to_string(path).map_err(|err| CompressorError::InvalidConfig {
            path: path.to_path_buf(),
            msg: err.to_string(),
        })?;
        Config::from_json(path, &text)
    }

    pub fn from_json(path: &Path, text: &str) -> Result<Self, CompressorError> {
        serde_json::from_str(text).map_err(|err| CompressorError::InvalidConfig {
            path: path.to_path_buf(),
            msg: err.to_string(),
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Job settings for one run. Quality is resolved but not range checked;
    /// that happens when the batch starts.
    pub fn job_settings(&self, input_dir: PathBuf, output_dir: PathBuf) -> Result<JobSettings, CompressorError> {
        let quality = match (&self.quality, &self.crf) {
            (Some(preset), crf) => Quality::from_preset(preset, crf.as_deref())?,
            // a bare crf means a custom quality
            (None, Some(crf)) => Quality::Custom(crf.clone()),
            (None, None) => Quality::default(),
        };
        Ok(JobSettings::new(input_dir, output_dir)
            .container(self.format.parse::<Container>()?)
            .quality(quality)
            .resolution(self.resolution.parse::<ResolutionPreset>()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config = Config::from_json(Path::new("c.json"), "{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_json(
            Path::new("c.json"),
            r#"{"format": "webm", "quality": "custom", "crf": "35", "ffmpeg": "/opt/ffmpeg/bin/ffmpeg"}"#,
        ).unwrap();
        assert_eq!(config.ffmpeg, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert_eq!(config.ffprobe, PathBuf::from("ffprobe"));

        let settings = config.job_settings(PathBuf::from("/in"), PathBuf::from("/out")).unwrap();
        assert_eq!(settings.container, Container::WebM);
        assert_eq!(settings.quality, Quality::Custom(String::from("35")));
        assert_eq!(settings.resolution, ResolutionPreset::Original);
    }

    #[test]
    fn test_unknown_field() {
        assert!(matches!(
            Config::from_json(Path::new("c.json"), r#"{"codec": "av1"}"#),
            Err(CompressorError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Config::load(Path::new("/nonexistent/config.json")),
            Err(CompressorError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"resolution": "720p", "poll_interval_ms": 250}"#).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.resolution, "720p");
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_bare_crf_means_custom() {
        let config = Config { crf: Some(String::from("40")), ..Config::default() };
        let settings = config.job_settings(PathBuf::from("/in"), PathBuf::from("/out")).unwrap();
        assert_eq!(settings.quality, Quality::Custom(String::from("40")));

        let config = Config { crf: Some(String::from("40")), quality: Some(String::from("high")), ..Config::default() };
        let settings = config.job_settings(PathBuf::from("/in"), PathBuf::from("/out")).unwrap();
        assert_eq!(settings.quality, Quality::High);
    }

    #[test]
    fn test_bad_names() {
        let config = Config { format: String::from("avi"), ..Config::default() };
        assert!(config.job_settings(PathBuf::from("/in"), PathBuf::from("/out")).is_err());
        let config = Config { resolution: String::from("8k"), ..Config::default() };
        assert!(config.job_settings(PathBuf::from("/in"), PathBuf::from("/out")).is_err());
    }
}
