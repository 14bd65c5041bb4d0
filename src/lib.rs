pub mod config;
pub mod error;
pub mod game;

#[cfg(feature = "gui")]
pub mod ui;

pub use error::{Error, Result};
