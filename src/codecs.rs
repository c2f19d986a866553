/// Video encoders the output formats are built on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Codec {
    H264,
    VP9,
}

impl Codec {
    pub fn cv_parameter(codec: Codec) -> &'static str {
        match codec {
            Codec::H264 => "libx264",
            Codec::VP9 => "libvpx-vp9",
        }
    }

    /// `-c:v` plus the rate control arguments for a constant rate factor.
    pub fn parameters(codec: Codec, crf: u8) -> Vec<String> {
        let mut params = vec![
            String::from("-c:v"), String::from(Codec::cv_parameter(codec)),
            String::from("-crf"), crf.to_string(),
        ];
        match codec {
            Codec::H264 => {
                params.push(String::from("-preset"));
                params.push(String::from("medium"));
            },
            // libvpx-vp9 only honours -crf as constant quality with a zero bitrate
            Codec::VP9 => {
                params.push(String::from("-b:v"));
                params.push(String::from("0"));
            },
        }
        params
    }
}
