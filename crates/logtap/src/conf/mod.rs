//! Conf module — configuration model and loading.

pub mod model;
pub mod load;

pub use load::DEFAULT_CONFIG_FILE;
pub use model::LogtapConfig;
