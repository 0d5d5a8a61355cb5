mod loader;

pub use loader::{load_fetch_config, ConfigError, FetchConfig};
