// Configuration module
// Public interface for configuration loading

pub mod constants;
mod loader;
mod settings;

pub use loader::{
    default_config_path, load_config, read_config_file, resolve, ConfigOverrides, FileConfig,
    FileStorageConfig,
};
pub use settings::{Config, StorageConfig};
