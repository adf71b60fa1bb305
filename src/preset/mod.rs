//! Named folder-structure presets stored as JSON files

pub mod error;
pub mod store;

pub use error::{PresetError, PresetResult};
pub use store::PresetStore;
