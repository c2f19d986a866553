use std::path::PathBuf;

use crate::containers::Container;
use crate::quality::Quality;
use crate::resolution::ResolutionPreset;

/// What one batch does. Not modified once the batch has started.
#[derive(Clone, Debug, PartialEq)]
pub struct JobSettings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub container: Container,
    pub quality: Quality,
    pub resolution: ResolutionPreset,
}

impl JobSettings {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        JobSettings {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            container: Container::default(),
            quality: Quality::default(),
            resolution: ResolutionPreset::default(),
        }
    }

    pub fn container(mut self, container: Container) -> Self {
        self.container = container;
        self
    }

    pub fn quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn resolution(mut self, resolution: ResolutionPreset) -> Self {
        self.resolution = resolution;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_default() {
        let settings = JobSettings::new("/in", "/out")
            .container(Container::WebM)
            .quality(Quality::High)
            .resolution(ResolutionPreset::HD);
        assert_eq!(settings.input_dir, PathBuf::from("/in"));
        assert_eq!(settings.output_dir, PathBuf::from("/out"));
        assert_eq!(settings.container, Container::WebM);
        assert_eq!(settings.quality, Quality::High);
        assert_eq!(settings.resolution, ResolutionPreset::HD);
    }

    #[test]
    fn test_defaults() {
        let settings = JobSettings::new("/in", "/out");
        assert_eq!(settings.container, Container::MP4);
        assert_eq!(settings.quality, Quality::Medium);
        assert_eq!(settings.resolution, ResolutionPreset::Original);
    }
}
