pub mod app;
pub mod cli;
pub mod file;
pub mod host;
pub mod organiser;
pub mod preset;
pub mod tree;
pub mod util;

pub use app::{config::Config, session::Session};
