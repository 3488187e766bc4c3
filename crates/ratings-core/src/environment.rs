//! Validation of the environment variables a service needs before it starts.

use std::collections::HashMap;
use std::fmt;

use crate::RatingsError;

/// Type an environment variable must parse to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvKind {
    Int,
    Float,
    String,
}

impl fmt::Display for EnvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvKind::Int => f.write_str("int"),
            EnvKind::Float => f.write_str("float"),
            EnvKind::String => f.write_str("string"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnvValue {
    Int(i64),
    Float(f64),
    String(String),
}

/// A set of required environment variables, all parsed to their kinds.
///
/// Construction fails as a whole if any one variable is missing, empty or
/// does not parse; the individual failures are logged.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    values: HashMap<String, EnvValue>,
}

impl Environment {
    /// Validate `options` against the process environment.
    pub fn from_options(options: &[(&str, EnvKind)]) -> Result<Self, RatingsError> {
        Self::from_lookup(options, |key| std::env::var(key).ok())
    }

    /// Validate `options` against an arbitrary source of values.
    pub fn from_lookup<F>(options: &[(&str, EnvKind)], lookup: F) -> Result<Self, RatingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if options.is_empty() {
            return Err(RatingsError::InvalidEnvironment(
                "no environment options provided".to_string(),
            ));
        }

        let mut values = HashMap::with_capacity(options.len());
        let mut failures = Vec::new();

        for (key, kind) in options {
            tracing::debug!("parsing environment option {} of type {}", key, kind);
            match parse_option(key, *kind, lookup(key)) {
                Ok(value) => {
                    values.insert((*key).to_string(), value);
                }
                Err(reason) => {
                    tracing::error!("{}", reason);
                    failures.push(reason);
                }
            }
        }

        if !failures.is_empty() {
            return Err(RatingsError::InvalidEnvironment(failures.join("; ")));
        }

        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&EnvValue> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(EnvValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(EnvValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(EnvValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_str_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.get_str(key).unwrap_or(fallback)
    }

    pub fn get_int_or(&self, key: &str, fallback: i64) -> i64 {
        self.get_int(key).unwrap_or(fallback)
    }

    pub fn get_float_or(&self, key: &str, fallback: f64) -> f64 {
        self.get_float(key).unwrap_or(fallback)
    }

    /// A validated port number. Fails if the value does not fit in a `u16`.
    pub fn port(&self, key: &str) -> Result<u16, RatingsError> {
        let raw = self.get_int(key).ok_or_else(|| {
            RatingsError::InvalidEnvironment(format!("{} was not validated as an int", key))
        })?;
        u16::try_from(raw).map_err(|_| {
            RatingsError::InvalidEnvironment(format!("{} is not a valid port: {}", key, raw))
        })
    }

    /// A validated string, for keys the caller registered as required.
    pub fn require_str(&self, key: &str) -> Result<String, RatingsError> {
        self.get_str(key).map(str::to_string).ok_or_else(|| {
            RatingsError::InvalidEnvironment(format!("{} was not validated as a string", key))
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn parse_option(key: &str, kind: EnvKind, raw: Option<String>) -> Result<EnvValue, String> {
    let raw = match raw {
        None => return Err(format!("{} does not exist as an environment variable", key)),
        Some(raw) if raw.is_empty() => {
            return Err(format!("no value for environment variable {} was provided", key))
        }
        Some(raw) => raw,
    };

    match kind {
        EnvKind::Int => raw
            .trim()
            .parse::<i64>()
            .map(EnvValue::Int)
            .map_err(|_| format!("unable to cast value of {} - {} to int", key, raw)),
        EnvKind::Float => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
            .map(EnvValue::Float)
            .ok_or_else(|| format!("unable to cast value of {} - {} to float", key, raw)),
        EnvKind::String => Ok(EnvValue::String(raw)),
    }
}
