use dotenvy;
use std::{
    env,
    path::{Path, PathBuf},
    time::Duration
};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_ENV_FILE: &str = "historylog.env";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got {value:?}")]
    NotPositive { key: String, value: String },

    #[error("failed to load env file {path}: {source}")]
    EnvFile { path: PathBuf, source: dotenvy::Error }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub model: String,
    pub repo_path: PathBuf,
    pub prompts_file: String,
    pub questions_file: String,
    pub answers_file: String,
    pub timeout: Duration,
    pub max_attempts: u32
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: String::from("http://localhost:11434"),
            model: String::from("llama3"),
            repo_path: PathBuf::from("."),
            prompts_file: String::from("questions_and_answers.txt"),
            questions_file: String::from("questions.txt"),
            answers_file: String::from("answers.txt"),
            timeout: Duration::from_secs(120),
            max_attempts: 3
        }
    }
}

impl Config {
    /// Loads `env_file` when given (it must exist), otherwise `historylog.env`
    /// if present, then reads every key from the environment.
    pub fn from_env(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        match env_file {
            Some(path) => load_env_file(path, true)?,
            None => load_env_file(Path::new(DEFAULT_ENV_FILE), false)?
        }
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let string_or = |key: &str, default: String| get(key).unwrap_or(default);
        Ok(Config {
            api_url: string_or("OLLAMA_API_URL", defaults.api_url)
                .trim_end_matches('/')
                .to_string(),
            model: string_or("OLLAMA_MODEL", defaults.model),
            repo_path: get("REPO_PATH").map(PathBuf::from).unwrap_or(defaults.repo_path),
            prompts_file: string_or("PROMPTS_FILE", defaults.prompts_file),
            questions_file: string_or("QUESTIONS_FILE", defaults.questions_file),
            answers_file: string_or("ANSWERS_FILE", defaults.answers_file),
            timeout: match get("REQUEST_TIMEOUT_SECS") {
                Some(value) => Duration::from_secs(parse_positive("REQUEST_TIMEOUT_SECS", &value)?),
                None => defaults.timeout
            },
            max_attempts: match get("MAX_ATTEMPTS") {
                Some(value) => parse_positive("MAX_ATTEMPTS", &value)? as u32,
                None => defaults.max_attempts
            }
        })
    }

    pub fn prompts_path(&self) -> PathBuf {
        self.repo_path.join(&self.prompts_file)
    }

    pub fn questions_path(&self) -> PathBuf {
        self.repo_path.join(&self.questions_file)
    }

    pub fn answers_path(&self) -> PathBuf {
        self.repo_path.join(&self.answers_file)
    }
}

// a missing optional file is fine, a malformed one never is.
fn load_env_file(path: &Path, required: bool) -> Result<(), ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() && !required => {
            debug!("no {} found, using process environment", path.display());
            Ok(())
        }
        Err(source) => Err(ConfigError::EnvFile {
            path: path.to_path_buf(),
            source
        })
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(var) if var > 0 && var <= u32::MAX as u64 => Ok(var),
        _ => Err(ConfigError::NotPositive {
            key: key.to_string(),
            value: value.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_url, "http://localhost:11434");
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.answers_path(), PathBuf::from("./answers.txt"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("OLLAMA_API_URL", "http://gpu-box:11434/"),
            ("REPO_PATH", "/srv/trivia"),
            ("QUESTIONS_FILE", "q.log"),
            ("MAX_ATTEMPTS", "5"),
        ]).unwrap();
        assert_eq!(config.api_url, "http://gpu-box:11434");
        assert_eq!(config.questions_path(), PathBuf::from("/srv/trivia/q.log"));
        assert_eq!(config.max_attempts, 5);
    }

    #[test]
    fn test_malformed_env_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_ENV_FILE);
        std::fs::write(&path, "REPO_PATH /srv/trivia\nMAX_ATTEMPTS=0\n").unwrap();
        assert!(matches!(load_env_file(&path, false), Err(ConfigError::EnvFile { .. })));
        assert!(matches!(load_env_file(&path, true), Err(ConfigError::EnvFile { .. })));
    }

    #[test]
    fn test_missing_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_ENV_FILE);
        assert!(load_env_file(&path, false).is_ok());
        assert!(matches!(load_env_file(&path, true), Err(ConfigError::EnvFile { .. })));
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(matches!(
            config_from(&[("MAX_ATTEMPTS", "0")]),
            Err(ConfigError::NotPositive { .. })
        ));
        assert!(matches!(
            config_from(&[("REQUEST_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::NotPositive { .. })
        ));
    }
}
