pub mod config;
pub mod logger;
pub mod passphrase;
pub mod tabmeta_toml;

pub use config::*;
pub use logger::setup_logging;
pub use passphrase::get_passphrase;
