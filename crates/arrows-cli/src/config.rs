use std::env;

/// Tool configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Default tracing filter when RUST_LOG is unset
    pub log_filter: String,
    /// Version stamped onto re-encoded maps instead of the decoded one
    pub version: Option<u16>,
    /// Pretty-print JSON output
    pub pretty_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            version: None,
            pretty_json: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let log_filter = lookup("ARROWS_LOG").unwrap_or(defaults.log_filter);
        let version = lookup("ARROWS_VERSION")
            .map(|v| v.trim().parse::<u16>())
            .transpose()
            .map_err(|e| anyhow::anyhow!("ARROWS_VERSION must be a number from 0 to 65535: {e}"))?;
        let pretty_json = match lookup("ARROWS_PRETTY_JSON") {
            Some(v) => parse_bool(&v)
                .ok_or_else(|| anyhow::anyhow!("ARROWS_PRETTY_JSON must be true or false, got {v:?}"))?,
            None => defaults.pretty_json,
        };

        Ok(Self {
            log_filter,
            version,
            pretty_json,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
