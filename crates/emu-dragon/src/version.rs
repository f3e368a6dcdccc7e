//! Emulator identity shown in diagnostics and the CLI.

/// Product name.
pub const NAME: &str = "DracoDS";

/// Release version.
pub const VERSION: &str = "1.4c";

/// `"DracoDS v1.4c"`.
#[must_use]
pub fn version_string() -> String {
    format!("{NAME} v{VERSION}")
}
