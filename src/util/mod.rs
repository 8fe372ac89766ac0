//! Text helpers for the terminal row listing.
//!
//! # Examples
//!
//! ```
//! use feedpane::util::{display_width, single_line, truncate_to_width};
//!
//! let summary = single_line("first line\nsecond line");
//! assert_eq!(summary, "first line second line");
//! assert_eq!(truncate_to_width(&summary, 13), "first line...");
//! assert_eq!(display_width("feed"), 4);
//! ```

mod text;

pub use text::{display_width, single_line, truncate_to_width};
