//! Runtime settings read from the environment (and `.env`, loaded by the
//! binary before this runs).
//!
//! | Variable                 | Default | Meaning                              |
//! |--------------------------|---------|--------------------------------------|
//! | `CHAIRSIDE_DAILY_GOAL`   | 500     | revenue goal shown on the metrics    |
//! | `CHAIRSIDE_DURATION_STEP`| 15      | minutes per shorten/extend           |
//! | `CHAIRSIDE_MIN_DURATION` | 15      | floor when shortening                |
//! | `CHAIRSIDE_SEED`         | unset   | JSON file loaded at start-up         |

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::schedule::DurationPolicy;

pub const DAILY_GOAL_VAR: &str = "CHAIRSIDE_DAILY_GOAL";
pub const DURATION_STEP_VAR: &str = "CHAIRSIDE_DURATION_STEP";
pub const MIN_DURATION_VAR: &str = "CHAIRSIDE_MIN_DURATION";
pub const SEED_VAR: &str = "CHAIRSIDE_SEED";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub daily_goal: f64,
    pub duration: DurationPolicy,
    pub seed_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            daily_goal: 500.0,
            duration: DurationPolicy::default(),
            seed_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let daily_goal: f64 = parse_var(&lookup, DAILY_GOAL_VAR, "a non-negative amount")?
            .unwrap_or(defaults.daily_goal);
        if !daily_goal.is_finite() || daily_goal < 0.0 {
            return Err(invalid(DAILY_GOAL_VAR, daily_goal, "a non-negative amount"));
        }

        let step: i64 = parse_var(&lookup, DURATION_STEP_VAR, "a positive number of minutes")?
            .unwrap_or(defaults.duration.step);
        if step <= 0 {
            return Err(invalid(DURATION_STEP_VAR, step, "a positive number of minutes"));
        }

        let minimum: i64 = parse_var(&lookup, MIN_DURATION_VAR, "a positive number of minutes")?
            .unwrap_or(defaults.duration.minimum);
        if minimum <= 0 {
            return Err(invalid(MIN_DURATION_VAR, minimum, "a positive number of minutes"));
        }

        let seed_path = lookup(SEED_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Config {
            daily_goal,
            duration: DurationPolicy { step, minimum },
            seed_path,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str, expected: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key,
                value: raw,
                expected,
            }),
    }
}

fn invalid(key: &'static str, value: impl ToString, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        expected,
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[rstest]
    fn it_should_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[rstest]
    fn it_should_read_every_variable() {
        let config = Config::from_lookup(lookup_from(&[
            (DAILY_GOAL_VAR, "350.5"),
            (DURATION_STEP_VAR, " 10 "),
            (MIN_DURATION_VAR, "20"),
            (SEED_VAR, "data/today.json"),
        ]))
        .unwrap();

        assert_eq!(config.daily_goal, 350.5);
        assert_eq!(config.duration, DurationPolicy { step: 10, minimum: 20 });
        assert_eq!(config.seed_path, Some(PathBuf::from("data/today.json")));
    }

    #[rstest]
    fn it_should_ignore_a_blank_seed_path() {
        let config = Config::from_lookup(lookup_from(&[(SEED_VAR, "  ")])).unwrap();
        assert_eq!(config.seed_path, None);
    }

    #[rstest]
    #[case(DAILY_GOAL_VAR, "lots")]
    #[case(DAILY_GOAL_VAR, "-1")]
    #[case(DURATION_STEP_VAR, "0")]
    #[case(DURATION_STEP_VAR, "1.5")]
    #[case(MIN_DURATION_VAR, "-15")]
    fn it_should_reject_invalid_values(#[case] key: &str, #[case] value: &str) {
        let result = Config::from_lookup(lookup_from(&[(key, value)]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: k, .. }) if k == key
        ));
    }
}
