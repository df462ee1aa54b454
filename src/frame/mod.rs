//! Frame selection.
//!
//! A capture is driven by an ordered list of host frame numbers. The list
//! comes from one of five selection modes; none of them sorts or
//! deduplicates beyond the mode's natural order.

use std::path::{Path, PathBuf};

use crate::util::{Error, Result};

/// Ordered sequence of host frame numbers. Duplicates are permitted.
pub type FrameSet = Vec<i32>;

/// Snapshot of the host timeline at resolution time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneTime {
    /// First frame of the scene timeline.
    pub start: i32,
    /// Last frame of the scene timeline (inclusive).
    pub end: i32,
    /// Current playhead frame.
    pub current: i32,
}

/// How to pick the frames of a capture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameSelection {
    /// Every frame of the scene timeline, `start..=end`.
    Timeline,
    /// Only the current playhead frame.
    Current,
    /// `start, start+step, ..` while `<= end`. `step` must be positive.
    Range { start: i32, end: i32, step: i32 },
    /// Comma-separated frame numbers. Tokens that do not parse as integers
    /// are silently dropped; input order is preserved.
    Custom(String),
    /// Frame numbers read from a CSV file, all cells in row-major order.
    /// Every cell must parse as an integer.
    Csv(PathBuf),
}

impl FrameSelection {
    /// Resolve this selection into a concrete frame list.
    pub fn resolve(&self, scene: &SceneTime) -> Result<FrameSet> {
        match self {
            Self::Timeline => Ok((scene.start..=scene.end).collect()),
            Self::Current => Ok(vec![scene.current]),
            Self::Range { start, end, step } => resolve_range(*start, *end, *step),
            Self::Custom(text) => Ok(resolve_custom(text)),
            Self::Csv(path) => resolve_csv(path),
        }
    }
}

fn resolve_range(start: i32, end: i32, step: i32) -> Result<FrameSet> {
    if step <= 0 {
        return Err(Error::config(format!(
            "range step must be a positive integer, got {step}"
        )));
    }
    let mut frames = Vec::new();
    let mut frame = start;
    while frame <= end {
        frames.push(frame);
        frame += step;
    }
    Ok(frames)
}

fn resolve_custom(text: &str) -> FrameSet {
    text.split(',')
        .filter_map(|token| token.trim().parse::<i32>().ok())
        .collect()
}

fn resolve_csv(path: &Path) -> Result<FrameSet> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound(path.to_path_buf())
        } else {
            Error::Io(e)
        }
    })?;

    let mut frames = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        for cell in line.split(',') {
            let token = cell.trim();
            let frame = token.parse::<i32>().map_err(|_| Error::ValueTranslation {
                token: token.to_string(),
                context: format!("cell in {}", path.display()),
            })?;
            frames.push(frame);
        }
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SCENE: SceneTime = SceneTime { start: 1, end: 5, current: 3 };

    #[test]
    fn test_timeline() {
        let frames = FrameSelection::Timeline.resolve(&SCENE).unwrap();
        assert_eq!(frames, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_current() {
        let frames = FrameSelection::Current.resolve(&SCENE).unwrap();
        assert_eq!(frames, vec![3]);
    }

    #[test]
    fn test_range() {
        let sel = FrameSelection::Range { start: 1, end: 10, step: 2 };
        assert_eq!(sel.resolve(&SCENE).unwrap(), vec![1, 3, 5, 7, 9]);

        // end inclusive when reachable
        let sel = FrameSelection::Range { start: 2, end: 8, step: 3 };
        assert_eq!(sel.resolve(&SCENE).unwrap(), vec![2, 5, 8]);
    }

    #[test]
    fn test_range_bad_step() {
        for step in [0, -1] {
            let sel = FrameSelection::Range { start: 1, end: 10, step };
            let err = sel.resolve(&SCENE).unwrap_err();
            assert!(matches!(err, Error::Configuration(_)));
        }
    }

    #[test]
    fn test_custom_drops_bad_tokens() {
        let sel = FrameSelection::Custom("1, 2, x, 10".into());
        assert_eq!(sel.resolve(&SCENE).unwrap(), vec![1, 2, 10]);
    }

    #[test]
    fn test_custom_keeps_order_and_duplicates() {
        let sel = FrameSelection::Custom("7,3,3,1".into());
        assert_eq!(sel.resolve(&SCENE).unwrap(), vec![7, 3, 3, 1]);
    }

    #[test]
    fn test_csv_ok() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1,2,3").unwrap();
        writeln!(file, "10, 11").unwrap();
        let sel = FrameSelection::Csv(file.path().to_path_buf());
        assert_eq!(sel.resolve(&SCENE).unwrap(), vec![1, 2, 3, 10, 11]);
    }

    #[test]
    fn test_csv_bad_cell() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "5\n6\nabc").unwrap();
        let sel = FrameSelection::Csv(file.path().to_path_buf());
        let err = sel.resolve(&SCENE).unwrap_err();
        match err {
            Error::ValueTranslation { token, .. } => assert_eq!(token, "abc"),
            other => panic!("expected ValueTranslation, got {other:?}"),
        }
    }

    #[test]
    fn test_csv_missing_file() {
        let sel = FrameSelection::Csv(PathBuf::from("/nonexistent/frames.csv"));
        assert!(matches!(sel.resolve(&SCENE).unwrap_err(), Error::FileNotFound(_)));
    }
}
