//! Recorded landmark streams
//!
//! A recording is a JSON-lines file, one frame per line:
//!
//! ```text
//! {"timestamp_ms": 0,  "landmarks": [[0.41, 0.52], [0.43, 0.50], ...]}
//! {"timestamp_ms": 33, "landmarks": null}
//! {"timestamp_ms": 66, "landmarks": null, "eye_area": 0.35}
//! ```
//!
//! `landmarks: null` is a frame without a face. `eye_area` carries a bare
//! openness signal from sources that do not report eyelid landmarks.

use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::Path;
use thiserror::Error;

use crate::tracking::LandmarkFrame;

/// Errors reading a recording
#[derive(Error, Debug)]
pub enum FrameError {
    /// File could not be read
    #[error("Failed to read frame recording: {0}")]
    Io(#[from] std::io::Error),

    /// A line is not a valid frame
    #[error("Invalid frame on line {line}: {source}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// Timestamps went backwards
    #[error("Frame timestamp went backwards on line {line}: {current}ms after {previous}ms")]
    NonMonotonic {
        /// 1-based line number
        line: usize,
        /// Previous timestamp
        previous: u64,
        /// Offending timestamp
        current: u64,
    },
}

/// One recorded camera frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Capture time
    pub timestamp_ms: u64,

    /// Detected landmarks; `None` when no face was found
    #[serde(default)]
    pub landmarks: Option<LandmarkFrame>,

    /// Normalized eye-area signal, for sources without eyelid landmarks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye_area: Option<f32>,
}

/// Parse a recording; blank lines are skipped
pub fn read_frames(reader: impl BufRead) -> Result<Vec<FrameRecord>, FrameError> {
    let mut frames: Vec<FrameRecord> = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record: FrameRecord = serde_json::from_str(&line).map_err(|source| FrameError::Parse {
            line: index + 1,
            source,
        })?;

        if let Some(previous) = frames.last() {
            if record.timestamp_ms < previous.timestamp_ms {
                return Err(FrameError::NonMonotonic {
                    line: index + 1,
                    previous: previous.timestamp_ms,
                    current: record.timestamp_ms,
                });
            }
        }

        frames.push(record);
    }

    Ok(frames)
}

/// Read a recording from disk
pub fn load_frames(path: impl AsRef<Path>) -> Result<Vec<FrameRecord>, FrameError> {
    let file = std::fs::File::open(path)?;
    read_frames(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_frames() {
        let input = r#"{"timestamp_ms": 0, "landmarks": [[0.1, 0.2], [0.3, 0.4]]}

{"timestamp_ms": 33, "landmarks": null}
{"timestamp_ms": 66, "eye_area": 0.5}
"#;
        let frames = read_frames(input.as_bytes()).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].landmarks.as_ref().map(|f| f.len()), Some(2));
        assert!(frames[1].landmarks.is_none());
        assert_eq!(frames[2].eye_area, Some(0.5));
    }

    #[test]
    fn test_parse_error_reports_line() {
        let input = "{\"timestamp_ms\": 0, \"landmarks\": null}\nnot json\n";
        match read_frames(input.as_bytes()) {
            Err(FrameError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_backwards_timestamp_rejected() {
        let input = "{\"timestamp_ms\": 50}\n{\"timestamp_ms\": 10}\n";
        assert!(matches!(
            read_frames(input.as_bytes()),
            Err(FrameError::NonMonotonic {
                line: 2,
                previous: 50,
                current: 10
            })
        ));
    }

    #[test]
    fn test_load_frames_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{\"timestamp_ms\": 7, \"landmarks\": null}}").unwrap();
        let frames = load_frames(file.path()).unwrap();
        assert_eq!(frames[0].timestamp_ms, 7);

        assert!(matches!(
            load_frames("/nonexistent/frames.jsonl"),
            Err(FrameError::Io(_))
        ));
    }
}
