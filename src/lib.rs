//! Locale-aware routing and translation resolution for the Israeli
//! skateparks directory (Hebrew/English).

pub mod config;
pub mod error;
pub mod i18n;
pub mod retry;
pub mod router;
pub mod security;
pub mod server;

pub use error::{Error, Result};
