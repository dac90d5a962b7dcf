//! Layered generation settings: CLI flags override `--set` values, which
//! override the TOML config file, which overrides [`defaults::DefaultsConfig`].

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::build_config;
pub use models::AppConfig;
