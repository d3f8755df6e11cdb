mod settings;

pub use settings::{EmailConfig, ModuleOptions, ServerConfig, Settings};
