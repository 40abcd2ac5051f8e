//! Application lifecycle and execution modes

pub mod lifetime;
pub mod modes;

pub use lifetime::{AppContext, prepare_app_context};
