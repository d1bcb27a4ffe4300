// src/monitor/mod.rs
mod driver;

pub use driver::{Clock, Monitor, ShutdownHandle};
