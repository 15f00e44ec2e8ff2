//! CLI-specific configuration for terminal output.
use std::env;

/// CLI presentation configuration.
///
/// This contains settings specific to the terminal interface, separate from
/// the battle configuration in `client-bootstrap`.
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub ui: UiConfig,
}

impl CliConfig {
    /// Construct CLI configuration from environment variables.
    ///
    /// Environment variables:
    /// - `NO_COLOR` - Disable colored output when set to anything
    /// - `CLI_SHOW_FINGERPRINTS` - Print the state fingerprint after each round (default: false)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if env::var_os("NO_COLOR").is_some() {
            config.ui.color = false;
        }

        if let Some(show) = read_env::<bool>("CLI_SHOW_FINGERPRINTS") {
            config.ui.show_fingerprints = show;
        }

        config
    }
}

/// Display configuration.
#[derive(Clone, Debug)]
pub struct UiConfig {
    pub color: bool,
    pub show_fingerprints: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_fingerprints: false,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
