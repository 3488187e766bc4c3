use ratings_core::{AggregationPolicy, EnvKind, Environment, RatingsError};

const OPTIONS: &[(&str, EnvKind)] = &[
    ("RATINGS_REQUEST_URL", EnvKind::String),
    ("RATINGS_SERVER_PORT", EnvKind::Int),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub request_url: String,
    pub policy: AggregationPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, RatingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `RATINGS_AGGREGATION_POLICY` is optional; when set it must name a
    /// known policy.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RatingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Environment::from_lookup(OPTIONS, &lookup)?;

        let policy = match lookup("RATINGS_AGGREGATION_POLICY") {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => AggregationPolicy::default(),
        };

        Ok(Self {
            port: env.port("RATINGS_SERVER_PORT")?,
            request_url: env.require_str("RATINGS_REQUEST_URL")?,
            policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults_to_all_priced() {
        let config = Config::from_lookup(lookup(&[
            ("RATINGS_REQUEST_URL", "https://data.example.com/stocks"),
            ("RATINGS_SERVER_PORT", "8081"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8081);
        assert_eq!(config.request_url, "https://data.example.com/stocks");
        assert_eq!(config.policy, AggregationPolicy::AllPriced);
    }

    #[test]
    fn test_config_policy_override() {
        let config = Config::from_lookup(lookup(&[
            ("RATINGS_REQUEST_URL", "https://data.example.com/stocks"),
            ("RATINGS_SERVER_PORT", "8081"),
            ("RATINGS_AGGREGATION_POLICY", "positive-return"),
        ]))
        .unwrap();
        assert_eq!(config.policy, AggregationPolicy::PositiveReturn);
    }

    #[test]
    fn test_config_rejects_unknown_policy() {
        let err = Config::from_lookup(lookup(&[
            ("RATINGS_REQUEST_URL", "https://data.example.com/stocks"),
            ("RATINGS_SERVER_PORT", "8081"),
            ("RATINGS_AGGREGATION_POLICY", "median"),
        ]))
        .unwrap_err();
        assert!(matches!(err, RatingsError::InvalidEnvironment(_)));
    }

    #[test]
    fn test_config_requires_port() {
        let err = Config::from_lookup(lookup(&[("RATINGS_REQUEST_URL", "https://data.example.com")]))
            .unwrap_err();
        assert!(err.to_string().contains("RATINGS_SERVER_PORT"));
    }
}
