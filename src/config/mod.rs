mod schema;

pub use schema::Config;

use anyhow::{anyhow, Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::query::{CacheSettings, Engine};

pub const CONFIG_ENV_VAR: &str = "GSQ_CONFIG";

/// resolve the config file path: explicit override, then `GSQ_CONFIG`, then `~/.gsq/config.json`
pub fn get_config_path(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    Ok(dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not find home directory"))?
        .join(".gsq")
        .join("config.json"))
}

/// load the config at `path`; a missing file yields the defaults
pub fn load(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// parse config text; comments and trailing commas are allowed
pub fn parse(content: &str) -> Result<Config> {
    Ok(json5::from_str(content)?)
}

pub fn save(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(())
}

/// Verify configuration file and return a list of errors
pub fn verify(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(anyhow!("config file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config = match parse(&content) {
        Ok(c) => c,
        Err(e) => {
            return Err(anyhow!("invalid JSON5: {}", e));
        }
    };

    Ok(validate(&config))
}

fn check_cache(cache: &CacheSettings) -> Option<String> {
    if cache.eviction_interval_ticks == 0 {
        return Some("cache.eviction_interval_ticks: must be greater than 0".to_string());
    }
    None
}

/// problems in an already parsed config
pub fn validate(config: &Config) -> Vec<String> {
    let mut errors = Vec::new();

    errors.extend(check_cache(&config.cache));

    // register aliases against a scratch engine to catch collisions
    let mut engine = match Engine::with_defaults(config.cache) {
        Ok(engine) => engine,
        Err(e) => {
            errors.push(format!("built-in queries: {}", e));
            return errors;
        }
    };
    for (alias, key) in &config.aliases {
        if let Err(e) = engine.register_alias(alias, key) {
            errors.push(format!("aliases.{}: {}", alias, e));
        }
    }

    errors
}

impl Engine {
    /// build an engine with the built-in queries plus the config's cache settings and aliases
    pub fn from_config(config: &Config) -> Result<Self> {
        if let Some(message) = check_cache(&config.cache) {
            return Err(anyhow!("Invalid cache settings in config: {}", message));
        }

        let mut engine = Engine::with_defaults(config.cache)
            .context("Failed to register built-in queries")?;

        for (alias, key) in &config.aliases {
            engine
                .register_alias(alias, key)
                .with_context(|| format!("Invalid alias in config: {}", alias))?;
        }

        Ok(engine)
    }
}

pub fn set_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["cache", "eviction_interval_ticks"] => {
            config.cache.eviction_interval_ticks = value
                .parse()
                .with_context(|| format!("Invalid number: {}", value))?;
        }
        ["cache", "min_entries_to_evict"] => {
            config.cache.min_entries_to_evict = value
                .parse()
                .with_context(|| format!("Invalid number: {}", value))?;
        }
        ["random_seed"] => {
            config.random_seed = if value.eq_ignore_ascii_case("none") || value.is_empty() {
                None
            } else {
                Some(
                    value
                        .parse()
                        .with_context(|| format!("Invalid number: {}", value))?,
                )
            };
        }
        ["aliases", alias] if !alias.trim().is_empty() => {
            if value.is_empty() {
                config.aliases.remove(*alias);
            } else {
                config.aliases.insert(alias.to_string(), value.to_string());
            }
        }
        _ => {
            return Err(anyhow!(
                "Unknown config key: {}. Valid keys are cache.eviction_interval_ticks, cache.min_entries_to_evict, random_seed, aliases.<ALIAS>",
                key
            ));
        }
    }

    Ok(())
}

/// generates a default config with example aliases
pub fn default_with_examples() -> Config {
    let mut config = Config::default();
    config
        .aliases
        .insert("SEASONS".to_string(), "SEASON".to_string());
    config
        .aliases
        .insert("HAS_ITEM".to_string(), "PLAYER_HAS_ITEM".to_string());
    config
}
