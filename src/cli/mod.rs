pub mod commands;
pub mod handlers;

pub use commands::{CliArgs, Commands, GenerateArgs, RuntimeArg};
pub use handlers::{generate_pipeline, handle_generate, resolve_config};
