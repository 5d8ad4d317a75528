//! Configuration module for Cashbook
//!
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::CashbookPaths;
pub use settings::Settings;
