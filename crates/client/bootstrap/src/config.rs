//! Client configuration read from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Data directory used when `BATTLE_DATA_DIR` is not set: the content bundled
/// with the workspace.
pub const DEFAULT_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../game/content/data");

/// Per-call script budget used when `SCRIPT_TIMEOUT_MS` is not set.
pub const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_millis(1_000);

/// Configuration required to assemble a battle and its front-end.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub data_dir: PathBuf,
    /// Replaces the team selection of `battle.toml`.
    pub teams: Option<Vec<String>>,
    pub max_rounds: Option<u32>,
    /// Switches the tie-break to the seeded policy.
    pub seed: Option<u64>,
    /// `None` disables the script budget.
    pub script_timeout: Option<Duration>,
    pub hook_interval: Option<u32>,
    /// JSON-lines mirror of the event stream.
    pub event_log: Option<PathBuf>,
    pub session_id: Option<String>,
    pub event_buffer_size: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            teams: None,
            max_rounds: None,
            seed: None,
            script_timeout: Some(DEFAULT_SCRIPT_TIMEOUT),
            hook_interval: None,
            event_log: None,
            session_id: None,
            event_buffer_size: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_DATA_DIR` - Content directory (default: bundled content)
    /// - `BATTLE_TEAMS` - Comma separated team ids overriding `battle.toml`
    /// - `BATTLE_MAX_ROUNDS` - Round limit (default: `battle.toml`, then 100)
    /// - `BATTLE_SEED` - Seed for the seeded tie-break
    /// - `SCRIPT_TIMEOUT_MS` - Per-call script budget, `0` disables (default: 1000)
    /// - `SCRIPT_HOOK_INTERVAL` - VM instructions between budget checks (default: 1000)
    /// - `BATTLE_EVENT_LOG` - Path of a JSON-lines event log (default: none)
    /// - `BATTLE_SESSION_ID` - Session identifier for log files (default: auto-generated)
    /// - `EVENT_BUFFER_SIZE` - Event bus capacity per topic (default: 100)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).map(|value| value.trim().to_string());
        let mut config = Self::default();

        if let Some(dir) = read("BATTLE_DATA_DIR").filter(|dir| !dir.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        config.teams = read("BATTLE_TEAMS")
            .map(|teams| parse_teams(&teams))
            .filter(|teams| !teams.is_empty());

        config.max_rounds = read("BATTLE_MAX_ROUNDS")
            .and_then(|value| value.parse::<u32>().ok())
            .map(|rounds| rounds.max(1));
        config.seed = read("BATTLE_SEED").and_then(|value| value.parse().ok());

        if let Some(ms) = read("SCRIPT_TIMEOUT_MS").and_then(|value| value.parse::<u64>().ok()) {
            config.script_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        config.hook_interval = read("SCRIPT_HOOK_INTERVAL").and_then(|value| value.parse().ok());

        config.event_log = read("BATTLE_EVENT_LOG")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        config.session_id = read("BATTLE_SESSION_ID").filter(|id| !id.is_empty());
        config.event_buffer_size = read("EVENT_BUFFER_SIZE")
            .and_then(|value| value.parse::<usize>().ok())
            .map(|size| size.max(1));

        config
    }
}

fn parse_teams(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|team| !team.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let config = config(&[]);
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.teams, None);
        assert_eq!(config.script_timeout, Some(DEFAULT_SCRIPT_TIMEOUT));
        assert_eq!(config.event_log, None);
    }

    #[test]
    fn reads_every_variable() {
        let config = config(&[
            ("BATTLE_DATA_DIR", "/srv/battle"),
            ("BATTLE_TEAMS", " heroes, ,raiders "),
            ("BATTLE_MAX_ROUNDS", "0"),
            ("BATTLE_SEED", "42"),
            ("SCRIPT_TIMEOUT_MS", "250"),
            ("SCRIPT_HOOK_INTERVAL", "500"),
            ("BATTLE_EVENT_LOG", "events.jsonl"),
            ("BATTLE_SESSION_ID", "s1"),
            ("EVENT_BUFFER_SIZE", "16"),
        ]);

        assert_eq!(config.data_dir, PathBuf::from("/srv/battle"));
        assert_eq!(
            config.teams,
            Some(vec!["heroes".to_string(), "raiders".to_string()])
        );
        assert_eq!(config.max_rounds, Some(1));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.script_timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.hook_interval, Some(500));
        assert_eq!(config.event_log, Some(PathBuf::from("events.jsonl")));
        assert_eq!(config.session_id.as_deref(), Some("s1"));
        assert_eq!(config.event_buffer_size, Some(16));
    }

    #[test]
    fn zero_timeout_disables_budget_and_garbage_is_ignored() {
        let config = config(&[
            ("SCRIPT_TIMEOUT_MS", "0"),
            ("BATTLE_SEED", "abc"),
            ("BATTLE_TEAMS", " , "),
        ]);
        assert_eq!(config.script_timeout, None);
        assert_eq!(config.seed, None);
        assert_eq!(config.teams, None);
    }
}
