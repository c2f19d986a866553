use std::ffi::OsString;
use std::path::Path;

use crate::containers::Container;
use crate::error::CompressorError;
use crate::resolution::ResolutionPreset;
use crate::settings::JobSettings;

/// Validated encoder settings for a batch.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeParameters {
    pub container: Container,
    pub crf: u8,
    pub resolution: ResolutionPreset,
}

impl EncodeParameters {
    /// Fails with `InvalidQuality` when a custom CRF is out of range.
    pub fn from_settings(settings: &JobSettings) -> Result<Self, CompressorError> {
        Ok(EncodeParameters {
            container: settings.container,
            crf: settings.quality.crf()?,
            resolution: settings.resolution,
        })
    }

    /// Encoder arguments for one file. Every value is its own argument, so
    /// nothing is ever interpreted by a shell.
    pub fn build_args(&self, source: &Path, destination: &Path) -> Vec<OsString> {
        fn os(s: &str) -> OsString { OsString::from(s) }

        let mut args = vec![
            os("-progress"), os("pipe:1"),
            os("-i"), source.as_os_str().to_os_string(),
            os("-y"),
        ];
        args.extend(self.resolution.parameters().iter().map(|s| os(s)));
        args.extend(Container::parameters(self.container, self.crf).iter().map(|s| os(s)));
        args.push(os("-c:a")); args.push(os("aac"));
        args.push(os("-b:a")); args.push(os("128k"));
        args.push(destination.as_os_str().to_os_string());
        args
    }
}
