//! Domain model: controllers and their diagnostic logs.

mod controller;
mod record;

pub use controller::{Controller, ControllerInfo};
pub use record::{ErrorLog, LogRecord};
