//! Error type for machine construction, snapshots and capture.

use std::fmt;

pub type Result<T> = std::result::Result<T, DragonError>;

#[derive(Debug)]
pub enum DragonError {
    /// A ROM or cartridge image failed its size or sanity check.
    InvalidImage { what: &'static str, reason: String },

    /// The snapshot is readable but was written for something else:
    /// wrong magic, unknown version or a different model.
    SnapshotFormatMismatch(String),

    /// The snapshot is truncated or structurally broken.
    SnapshotCorrupt(String),

    Io(std::io::Error),

    #[cfg(feature = "native")]
    Png(png::EncodingError),

    #[cfg(feature = "native")]
    Wav(hound::Error),
}

impl DragonError {
    pub(crate) fn invalid_image(what: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidImage {
            what,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DragonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidImage { what, reason } => write!(f, "invalid {what} image: {reason}"),
            Self::SnapshotFormatMismatch(reason) => {
                write!(f, "snapshot format mismatch: {reason}")
            }
            Self::SnapshotCorrupt(reason) => write!(f, "snapshot corrupt: {reason}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            #[cfg(feature = "native")]
            Self::Png(e) => write!(f, "png error: {e}"),
            #[cfg(feature = "native")]
            Self::Wav(e) => write!(f, "wav error: {e}"),
        }
    }
}

impl std::error::Error for DragonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "native")]
            Self::Png(e) => Some(e),
            #[cfg(feature = "native")]
            Self::Wav(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DragonError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(feature = "native")]
impl From<png::EncodingError> for DragonError {
    fn from(e: png::EncodingError) -> Self {
        Self::Png(e)
    }
}

#[cfg(feature = "native")]
impl From<hound::Error> for DragonError {
    fn from(e: hound::Error) -> Self {
        Self::Wav(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = DragonError::invalid_image("BASIC ROM", "too short");
        assert_eq!(err.to_string(), "invalid BASIC ROM image: too short");
        assert_eq!(
            DragonError::SnapshotCorrupt("3 trailing bytes".into()).to_string(),
            "snapshot corrupt: 3 trailing bytes"
        );
    }

    #[test]
    fn io_errors_convert() {
        let err: DragonError = std::io::Error::other("disk gone").into();
        assert!(matches!(err, DragonError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
