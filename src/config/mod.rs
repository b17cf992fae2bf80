pub mod level;
pub mod loader;
pub mod schema;
pub mod size;
pub mod template;

pub use level::LogLevel;
pub use loader::ConfigError;
pub use schema::{Config, DumperSettings, TelegramSettings};
pub use size::ByteSize;
pub use template::{write_template, CONFIG_TEMPLATE};
