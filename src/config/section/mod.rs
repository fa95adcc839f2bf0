//! Configuration section definitions.

mod activate;
mod gatsby;
mod paths;
mod watch;

pub use activate::{ActivateConfig, StrategyKind};
pub use gatsby::GatsbyConfig;
pub use paths::PathsConfig;
pub use watch::WatchConfig;
