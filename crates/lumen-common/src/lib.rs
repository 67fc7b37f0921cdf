//! lumen-common: Shared errors and the allow-listed HTTP client used across Lumen crates.

pub mod error;
pub mod sandbox;

pub use error::{LumenError, Result};
pub use sandbox::SandboxClient;
