//! Timestamp helpers shared across the crate.

mod timestamps;

pub use timestamps::{iso_timestamp, now_utc, Timestamp};
