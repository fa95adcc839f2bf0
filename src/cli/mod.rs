//! Command-line interface module.

mod args;
pub mod build;
pub mod common;
pub mod site;
pub mod start;

pub use args::{Cli, Commands};
pub use common::Project;
