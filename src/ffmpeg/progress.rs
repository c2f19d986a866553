use std::io::{BufRead, ErrorKind, Lines};

const OUT_TIME_KEY: &str = "out_time_ms=";

/// Turns ffmpeg `-progress` telemetry into completion percentages.
///
/// Yields one value in `0.0..=100.0` per parseable `out_time_ms=` line.
/// Nothing is yielded while the total duration is unknown (zero). Other keys
/// and garbage lines are skipped; the sequence ends with the stream.
pub struct ProgressParser<R: BufRead> {
    lines: Lines<R>,
    total_seconds: f64,
}

impl<R: BufRead> ProgressParser<R> {
    pub fn new(reader: R, total_seconds: f64) -> Self {
        ProgressParser {
            lines: reader.lines(),
            total_seconds,
        }
    }
}

impl<R: BufRead> Iterator for ProgressParser<R> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) if err.kind() == ErrorKind::InvalidData => continue,
                Err(_) => return None,
            };
            if let Some(progress) = parse_progress_line(&line, self.total_seconds) {
                return Some(progress);
            }
        }
    }
}

/// ffmpeg reports `out_time_ms` in microseconds despite the name.
pub fn parse_progress_line(line: &str, total_seconds: f64) -> Option<f64> {
    let value = line.trim().strip_prefix(OUT_TIME_KEY)?;
    let micros: i64 = value.trim().parse().ok()?;
    if total_seconds <= 0.0 {
        return None;
    }
    let elapsed = micros as f64 / 1_000_000.0;
    Some((100.0 * elapsed / total_seconds).clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_half_way() {
        assert_eq!(parse_progress_line("out_time_ms=5000000", 10.0), Some(50.0));
    }

    #[test]
    fn test_other_lines() {
        assert_eq!(parse_progress_line("out_time=00:00:05.000000", 10.0), None);
        assert_eq!(parse_progress_line("frame=120", 10.0), None);
        assert_eq!(parse_progress_line("progress=continue", 10.0), None);
        assert_eq!(parse_progress_line("out_time_ms=N/A", 10.0), None);
        assert_eq!(parse_progress_line("", 10.0), None);
    }

    #[test]
    fn test_clamped() {
        assert_eq!(parse_progress_line("out_time_ms=25000000", 10.0), Some(100.0));
        assert_eq!(parse_progress_line("out_time_ms=-9223372036854775807", 10.0), Some(0.0));
    }

    #[test]
    fn test_unknown_duration() {
        assert_eq!(parse_progress_line("out_time_ms=5000000", 0.0), None);
    }

    #[test]
    fn test_parser_stream() {
        let telemetry = "frame=10\nfps=25.0\nout_time_ms=2500000\nprogress=continue\n\
            garbage\nout_time_ms=bogus\nout_time_ms=10000000\nprogress=end\n";
        let progress: Vec<f64> = ProgressParser::new(Cursor::new(telemetry), 10.0).collect();
        assert_eq!(progress, vec![25.0, 100.0]);
    }

    #[test]
    fn test_parser_skips_invalid_utf8() {
        let mut telemetry = b"out_time_ms=1000000\n".to_vec();
        telemetry.extend_from_slice(&[0xff, 0xfe, b'\n']);
        telemetry.extend_from_slice(b"out_time_ms=3000000\n");
        let progress: Vec<f64> = ProgressParser::new(Cursor::new(telemetry), 4.0).collect();
        assert_eq!(progress, vec![25.0, 75.0]);
    }

    #[test]
    fn test_parser_unknown_duration_yields_nothing() {
        let telemetry = "out_time_ms=1000000\nout_time_ms=2000000\n";
        assert_eq!(ProgressParser::new(Cursor::new(telemetry), 0.0).count(), 0);
    }
}
