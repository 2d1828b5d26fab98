//! # API Module
//!
//! HTTP handlers for the local server that receives the OAuth redirect.
//!
//! - [`callback`] - Checks `state`, exchanges the authorization code for a token
//!   and hands it back to the waiting authorization flow.
//! - [`health`] - Reports status and version.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
