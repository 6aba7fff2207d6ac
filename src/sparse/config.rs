//! Sparse array configuration.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// How the end of a range is written into a request URL.
///
/// Ranges are half-open inside the crate. Endpoints disagree on whether the
/// second URL parameter is the last index or one past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpperBound {
    /// `$2` is one past the last index.
    #[default]
    Exclusive,
    /// `$2` is the last index.
    Inclusive,
}

impl UpperBound {
    /// End value to put on the wire for `range`.
    pub fn wire_end(self, range: &Range<usize>) -> usize {
        match self {
            UpperBound::Exclusive => range.end,
            UpperBound::Inclusive => range.end.saturating_sub(1),
        }
    }
}

/// Configuration for a [`SparseArray`](super::SparseArray).
///
/// Unknown fields are rejected; missing fields take their defaults.
///
/// ```rust
/// use tally::SparseArrayConfig;
///
/// let config: SparseArrayConfig = serde_json::from_str(
///     r#"{"json_url": "/signoffs/de?from=$1&to=$2", "length": 250}"#,
/// ).unwrap();
/// assert_eq!(config.buffer_size, 10);
/// assert_eq!(config.format_url(&(20..40)), "/signoffs/de?from=20&to=40");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SparseArrayConfig {
    /// Request URL template; `$1` is replaced by the range start, `$2` by its end.
    pub json_url: String,
    /// Key of the element array in the JSON response.
    pub json_items_key: String,
    /// Total logical length.
    pub length: usize,
    /// Read-ahead margin added on both sides of a requested window.
    pub buffer_size: usize,
    /// Optional URL reporting the total length.
    pub length_url: Option<String>,
    /// Wire convention for `$2`.
    pub upper_bound: UpperBound,
}

impl Default for SparseArrayConfig {
    fn default() -> Self {
        Self {
            json_url: String::new(),
            json_items_key: "items".to_string(),
            length: 10,
            buffer_size: 10,
            length_url: None,
            upper_bound: UpperBound::Exclusive,
        }
    }
}

impl SparseArrayConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request URL template.
    pub fn with_json_url(mut self, url: impl Into<String>) -> Self {
        self.json_url = url.into();
        self
    }

    /// Set the response key holding the elements.
    pub fn with_json_items_key(mut self, key: impl Into<String>) -> Self {
        self.json_items_key = key.into();
        self
    }

    /// Set the total logical length.
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Set the read-ahead margin.
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Set the URL reporting the total length.
    pub fn with_length_url(mut self, url: impl Into<String>) -> Self {
        self.length_url = Some(url.into());
        self
    }

    /// Set the wire convention for the range end.
    pub fn with_upper_bound(mut self, upper_bound: UpperBound) -> Self {
        self.upper_bound = upper_bound;
        self
    }

    /// Request URL for `range`.
    pub fn format_url(&self, range: &Range<usize>) -> String {
        self.json_url
            .replace("$1", &range.start.to_string())
            .replace("$2", &self.upper_bound.wire_end(range).to_string())
    }
}
