use std::ops::Range;

use thiserror::Error as ThisError;

/// Boxed error produced by fetch capabilities.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias for `tally`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by clustering and sparse-array primitives.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Operation needs state that has not been computed yet.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Requested window is malformed (`from > to`).
    #[error("invalid range {from}..{to} for array of length {len}")]
    InvalidRange {
        /// Window start.
        from: usize,
        /// Window end (exclusive).
        to: usize,
        /// Logical length of the array.
        len: usize,
    },

    /// The fetch capability failed.
    #[error("fetch of {}..{} failed: {source}", .range.start, .range.end)]
    Fetch {
        /// Half-open range that was requested.
        range: Range<usize>,
        /// Underlying transport or parse error.
        #[source]
        source: BoxError,
    },

    /// The fetch capability returned a different number of elements than requested.
    #[error(
        "fetch of {}..{} returned {received} elements, expected {expected}",
        .range.start,
        .range.end
    )]
    FetchLengthMismatch {
        /// Half-open range that was requested.
        range: Range<usize>,
        /// Elements expected (`range.len()`).
        expected: usize,
        /// Elements received.
        received: usize,
    },

    /// The fetch capability failed to report the total length.
    #[error("length lookup failed: {0}")]
    Length(#[source] BoxError),

    /// Building the blocking runtime failed.
    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

impl Error {
    /// Wrap a fetch failure for `range`.
    pub fn fetch(range: Range<usize>, source: impl Into<BoxError>) -> Self {
        Error::Fetch {
            range,
            source: source.into(),
        }
    }

    /// Whether this error came from the fetch capability (transport or shape).
    pub fn is_fetch(&self) -> bool {
        matches!(
            self,
            Error::Fetch { .. } | Error::FetchLengthMismatch { .. } | Error::Length(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = Error::InvalidParameter {
            name: "level",
            message: "must be >= 0",
        };
        assert_eq!(e.to_string(), "invalid parameter 'level': must be >= 0");

        let e = Error::InvalidRange {
            from: 5,
            to: 2,
            len: 10,
        };
        assert_eq!(e.to_string(), "invalid range 5..2 for array of length 10");

        let e = Error::FetchLengthMismatch {
            range: 0..4,
            expected: 4,
            received: 3,
        };
        assert_eq!(
            e.to_string(),
            "fetch of 0..4 returned 3 elements, expected 4"
        );
    }

    #[test]
    fn test_fetch_source_is_kept() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let e = Error::fetch(10..20, io);
        assert!(e.is_fetch());
        assert_eq!(e.to_string(), "fetch of 10..20 failed: timed out");
        assert!(std::error::Error::source(&e).is_some());
    }
}
