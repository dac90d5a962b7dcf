use molgen::core::models::unit::Unit;
use molgen::engine::config::GenerationConfig;
use std::path::PathBuf;

pub struct AppConfig {
    /// Selected units in enumeration order.
    pub units: Vec<Unit>,
    pub core_config: GenerationConfig,
    pub output_path: Option<PathBuf>,
    pub display_limit: usize,
}
