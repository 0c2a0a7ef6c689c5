//! Toolchain-wide, environment-driven runtime options
//!
//! The pipeline has almost no tunable behavior -- each stage is a pure
//! transducer over its input -- so this stays intentionally small.

use std::env;

/// Runtime options shared by the three `bin/` entry points
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Whether to colorize diagnostics written to stderr
    pub color: bool,
}

impl Options {
    /// Build options from the process environment.
    ///
    /// `NO_COLOR` (any value) disables color; `FORCE_COLOR` (any value)
    /// re-enables it even when stderr isn't a terminal.
    pub fn from_env() -> Options {
        let color = if env::var_os("NO_COLOR").is_some() {
            false
        } else {
            env::var_os("FORCE_COLOR").is_some() || colored::control::SHOULD_COLORIZE.should_colorize()
        };
        Options { color }
    }

    /// Apply the color setting to the global `colored` override.
    pub fn apply(&self) {
        colored::control::set_override(self.color);
    }
}

impl Default for Options {
    fn default() -> Options {
        Options { color: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_enable_color() {
        let opts = Options::default();
        assert!(opts.color);
    }
}
