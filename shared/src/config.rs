use serde::Deserialize;

fn default_bind_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8001
}

fn default_builtin_lexicon() -> bool {
    true
}

fn default_service_url() -> String {
    "http://ia-1-nlu:8001".into()
}

fn default_timeout_ms() -> u64 {
    5_000
}

/// Runtime settings, read from `NLU_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Optional word list extending the numeral detector, one word per line.
    #[serde(default)]
    pub numeral_lexicon: Option<String>,
    #[serde(default = "default_builtin_lexicon")]
    pub builtin_lexicon: bool,
    /// Base URL of the parser service, used by [`crate::nlu_client`].
    #[serde(default = "default_service_url")]
    pub service_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            numeral_lexicon: None,
            builtin_lexicon: default_builtin_lexicon(),
            service_url: default_service_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::from_environment(config::Environment::with_prefix("NLU"))
    }

    fn from_environment(env: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("NLU").source(Some(map))
    }

    #[test]
    fn defaults_when_unset() {
        let settings = Settings::from_environment(env(&[])).unwrap();
        assert_eq!(settings.bind_addr, "0.0.0.0");
        assert_eq!(settings.port, 8001);
        assert!(settings.numeral_lexicon.is_none());
        assert!(settings.builtin_lexicon);
        assert_eq!(settings.timeout_ms, 5_000);
    }

    #[test]
    fn reads_prefixed_vars() {
        let settings = Settings::from_environment(env(&[
            ("NLU_PORT", "9100"),
            ("NLU_NUMERAL_LEXICON", "/etc/nlu/numerals.txt"),
            ("NLU_BUILTIN_LEXICON", "false"),
        ]))
        .unwrap();
        assert_eq!(settings.port, 9100);
        assert_eq!(settings.numeral_lexicon.as_deref(), Some("/etc/nlu/numerals.txt"));
        assert!(!settings.builtin_lexicon);
    }
}
