//! Utility modules shared by the commands.

pub mod exec;
pub mod path;
