// C-Dogs SDL display subsystem
// Mode negotiation, surface lifecycle and screen buffers

pub mod cli;
pub mod config;
pub mod graphics;
pub mod logging;

pub use cli::Cli;
pub use config::Config;
pub use graphics::{GraphicsDevice, GraphicsError};
pub use logging::LogLevel;
