//! Host environments the widget can run in.

#[cfg(feature = "browser")]
pub mod browser;

#[cfg(feature = "cli")]
pub mod cli;
