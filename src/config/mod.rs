//! Configuration loading for Cosmic Explorer.
//!
//! Settings live in `conf/config.toml`, grouped into tables (`[story]`,
//! `[scroll]`, `[audio]`, `[i18n]`, `[share]`, `[logging]`). The flat form
//! with every key at the top level is accepted too. Missing or invalid
//! entries fall back to defaults so a run can always start.

mod defaults;
mod io;
mod models;
mod tables;

pub use io::{load_config, serialize_config};
