pub mod config;
pub mod preferences;
pub mod session;
pub mod settings;
