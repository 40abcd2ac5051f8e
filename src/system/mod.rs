//! System-level modules
//!
//! Process setup that runs once before any mode starts: logging.

pub mod logging;

pub use logging::init_logging;
