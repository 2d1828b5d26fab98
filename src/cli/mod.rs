//! # CLI Module
//!
//! The interactive driver. [`curate`] walks a run from the credentials file
//! to the library update, narrating progress on the console and asking the
//! user before anything is written.
//!
//! ```bash
//! dewey ~/.config/dewey.toml
//! ```

mod curate;

pub use curate::{RunOutcome, curate, run};
