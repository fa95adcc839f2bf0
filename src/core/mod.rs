//! Process-wide state.

mod state;

pub use state::{is_shutdown, request_shutdown, set_watching, setup_shutdown_handler};
