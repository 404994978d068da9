use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::rewrite::{
    DEFAULT_LEVELS, DEFAULT_LOGGER_ATTRIBUTE, DEFAULT_RECEIVER, DEFAULT_SESSION_ATTRIBUTE,
    EligibilityRule, RewriteOptions,
};

pub const CONFIG_FILE_NAME: &str = ".sidtagrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default = "default_receiver")]
    pub receiver: String,
    #[serde(default = "default_logger_attribute")]
    pub logger_attribute: String,
    #[serde(default = "default_session_attribute")]
    pub session_attribute: String,
    #[serde(default = "default_levels")]
    pub levels: Vec<String>,
    #[serde(default)]
    pub eligibility: EligibilityRule,
}

fn default_ignores() -> Vec<String> {
    [
        "**/.git/**",
        "**/.venv/**",
        "**/venv/**",
        "**/.tox/**",
        "**/__pycache__/**",
        "**/site-packages/**",
    ]
    .map(String::from)
    .to_vec()
}

fn default_receiver() -> String {
    DEFAULT_RECEIVER.to_string()
}

fn default_logger_attribute() -> String {
    DEFAULT_LOGGER_ATTRIBUTE.to_string()
}

fn default_session_attribute() -> String {
    DEFAULT_SESSION_ATTRIBUTE.to_string()
}

fn default_levels() -> Vec<String> {
    DEFAULT_LEVELS.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            includes: Vec::new(),
            ignores: default_ignores(),
            receiver: default_receiver(),
            logger_attribute: default_logger_attribute(),
            session_attribute: default_session_attribute(),
            levels: default_levels(),
            eligibility: EligibilityRule::default(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern is invalid, if `levels` is empty,
    /// or if a configured name is not a Python identifier.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        if self.levels.is_empty() {
            bail!("'levels' must name at least one logger method");
        }

        let names = [
            ("receiver", &self.receiver),
            ("loggerAttribute", &self.logger_attribute),
            ("sessionAttribute", &self.session_attribute),
        ];
        for (field, name) in names
            .into_iter()
            .chain(self.levels.iter().map(|level| ("levels", level)))
        {
            if !is_identifier(name) {
                bail!("'{}' is not a valid Python identifier: \"{}\"", field, name);
            }
        }

        Ok(())
    }

    pub fn rewrite_options(&self) -> RewriteOptions {
        RewriteOptions {
            receiver: self.receiver.clone(),
            logger_attribute: self.logger_attribute.clone(),
            session_attribute: self.session_attribute.clone(),
            levels: self.levels.clone(),
            eligibility: self.eligibility,
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    // Relative paths such as "." cannot be popped upward.
    let mut current = std::path::absolute(start_dir).unwrap_or_else(|_| start_dir.to_path_buf());

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
