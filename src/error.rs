use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AwrError {
    #[error("couldn't read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A report line that belongs to a known section but can't be read.
    #[error("{file}:{line_no}: {reason} (release {version})\n    > {line}")]
    Parse {
        file: String,
        line_no: usize,
        line: String,
        version: String,
        reason: String,
    },

    #[error("{file}: no database release found in the report header")]
    VersionNotFound { file: String },

    #[error("{file}: unsupported database release '{version}'")]
    BadVersion { file: String, version: String },

    #[error("couldn't write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("couldn't serialize snapshots: {0}")]
    Json(#[from] serde_json::Error),
}

impl AwrError {
    /// Name of the report file the error refers to, if any.
    pub fn file(&self) -> Option<&str> {
        match self {
            AwrError::Parse { file, .. }
            | AwrError::VersionNotFound { file }
            | AwrError::BadVersion { file, .. } => Some(file),
            AwrError::Io { path, .. } => path.file_name().and_then(|n| n.to_str()),
            AwrError::Output { .. } | AwrError::Json(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_file_line_and_release() {
        let err = AwrError::Parse {
            file: "awr_100.txt".to_string(),
            line_no: 42,
            line: "Begin Snap:  100 garbage".to_string(),
            version: "12.1.0.2.0".to_string(),
            reason: "bad snapshot date".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("awr_100.txt:42"));
        assert!(msg.contains("12.1.0.2.0"));
        assert!(msg.contains("Begin Snap:  100 garbage"));
        assert_eq!(err.file(), Some("awr_100.txt"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = AwrError::Io {
            path: PathBuf::from("/tmp/reports/awr_1.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/tmp/reports/awr_1.txt"));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.file(), Some("awr_1.txt"));
    }

    #[test]
    fn test_version_not_found_display() {
        let err = AwrError::VersionNotFound { file: "x.txt".to_string() };
        assert_eq!(err.to_string(), "x.txt: no database release found in the report header");
    }
}
