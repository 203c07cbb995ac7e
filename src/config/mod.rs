//! Configuration module for cardcycle
//!
//! - Path resolution (environment override, XDG, Windows APPDATA)
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::CyclePaths;
pub use settings::Settings;
