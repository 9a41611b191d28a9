//! vmsetup - Ubuntu VM provisioning workflows
//!
//! Each workflow prints a dot-padded checklist, one label per step, followed
//! by a pass or fail glyph.

pub mod commands;
pub mod config;
pub mod constants;
pub mod paths;
pub mod system;
pub mod ui;
