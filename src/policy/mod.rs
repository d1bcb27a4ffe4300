// src/policy/mod.rs
mod decision;

pub use decision::{continuous_alert, single_check_alert, LastStatus};
