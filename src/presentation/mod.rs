//! Presentation layer: CLI commands, output rendering and navigation.

/// Command execution.
pub mod commands;
/// Redirect-to-login signal.
pub mod navigation;
/// Row rendering.
pub mod render;

pub use commands::{CommandError, CommandRunner, Completion};
pub use navigation::LoginRedirect;
