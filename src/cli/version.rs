//! Version command for the cvedash CLI.

/// The current version of cvedash, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_line() -> String {
    format!("cvedash {}", VERSION)
}
