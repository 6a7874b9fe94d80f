pub mod hosting;

pub use hosting::{CONFIG_JSON_ENV, CONFIG_PATH_ENV, HostingConfig, HostingConfigSource};
