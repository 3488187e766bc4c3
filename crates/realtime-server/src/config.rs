use ratings_core::{EnvKind, Environment, RatingsError};

const OPTIONS: &[(&str, EnvKind)] = &[
    ("REALTIME_SERVER_PORT", EnvKind::Int),
    ("RATINGS_SERVICE_URI", EnvKind::String),
    ("RATINGS_HISTORY_SERVICE_URI", EnvKind::String),
    ("TICKER_SERVICE_URI", EnvKind::String),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub ratings_uri: String,
    pub ratings_history_uri: String,
    pub ticker_uri: String,
}

impl Config {
    pub fn from_env() -> Result<Self, RatingsError> {
        Self::from_environment(&Environment::from_options(OPTIONS)?)
    }

    pub fn from_environment(env: &Environment) -> Result<Self, RatingsError> {
        Ok(Self {
            port: env.port("REALTIME_SERVER_PORT")?,
            ratings_uri: env.require_str("RATINGS_SERVICE_URI")?,
            ratings_history_uri: env.require_str("RATINGS_HISTORY_SERVICE_URI")?,
            ticker_uri: env.require_str("TICKER_SERVICE_URI")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_environment() {
        let env = Environment::from_lookup(OPTIONS, |key| {
            Some(match key {
                "REALTIME_SERVER_PORT" => "8084".to_string(),
                other => format!("http://{}", other.to_lowercase()),
            })
        })
        .unwrap();

        let config = Config::from_environment(&env).unwrap();
        assert_eq!(config.port, 8084);
        assert_eq!(config.ticker_uri, "http://ticker_service_uri");
    }

    #[test]
    fn test_config_rejects_out_of_range_port() {
        let env = Environment::from_lookup(OPTIONS, |key| {
            Some(match key {
                "REALTIME_SERVER_PORT" => "70000".to_string(),
                _ => "http://localhost".to_string(),
            })
        })
        .unwrap();

        assert!(Config::from_environment(&env).is_err());
    }
}
