//! Lazily paged virtual arrays.
//!
//! Wide tables (push logs, sign-off histories) can have thousands of rows, of
//! which a view shows a few dozen. A [`SparseArray`] presents the whole table
//! as an array of known length and only fetches what a view asks for.
//!
//! ## Fetching
//!
//! `get(from, to)` on a window that is not fully resident:
//!
//! 1. Widen the window by `buffer_size` on both sides, clamped to `[0, len)`.
//! 2. Find the first missing index from the left and from the right.
//! 3. Fetch that whole span in **one** request, even if resident islands lie
//!    inside it.
//! 4. Install the result and serve the window from the cache.
//!
//! ```text
//! index     0    10   15   20        30   35        100
//! resident  ######
//! request                  [from .. to)
//! padded              [  buffer  ..   buffer ]
//! fetched             [15 ................ 35)
//! ```
//!
//! Ranges are half-open everywhere in the crate. [`UpperBound`] decides how the
//! end is written into a request URL.
//!
//! ## Concurrency
//!
//! One fetch at a time per array. A second `get` arriving while a fetch runs
//! waits for it and then re-checks the cache, so overlapping views never
//! request the same gap twice. There is no cancellation: a caller that loses
//! interest drops its future, and the fetch it was waiting on still completes
//! for everyone else.

mod array;
mod config;
mod fetch;
mod gap;
#[cfg(feature = "http")]
mod http;

pub use array::SparseArray;
pub use config::{SparseArrayConfig, UpperBound};
pub use fetch::{fetch_fn, Fetch, FnFetch};
#[cfg(feature = "http")]
pub use http::JsonFetcher;
