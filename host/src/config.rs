use std::{env, fs, path::Path};

use anyhow::{anyhow, Context, Result};
use asteroids_core::GameConfig;

pub const ENV_WIDTH: &str = "ASTEROIDS_WIDTH";
pub const ENV_HEIGHT: &str = "ASTEROIDS_HEIGHT";
pub const ENV_SEED: &str = "ASTEROIDS_SEED";

/// Environment overrides applied on top of the file config. Unparsable or
/// zero values are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EnvOverrides {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub seed: Option<u32>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            width: read_positive_f64(lookup(ENV_WIDTH)),
            height: read_positive_f64(lookup(ENV_HEIGHT)),
            seed: lookup(ENV_SEED)
                .and_then(|value| parse_seed(&value).ok())
                .filter(|value| *value > 0),
        }
    }

    pub fn apply(&self, mut config: GameConfig) -> GameConfig {
        if let Some(width) = self.width {
            config.playfield.width = width;
        }
        if let Some(height) = self.height {
            config.playfield.height = height;
        }
        config
    }
}

fn read_positive_f64(value: Option<String>) -> Option<f64> {
    value
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value > 0.0)
}

/// Defaults, then the optional JSON file, then the environment.
pub fn load_config(path: Option<&Path>, overrides: &EnvOverrides) -> Result<GameConfig> {
    let config = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let value = serde_json::from_str::<serde_json::Value>(&raw)
                .with_context(|| format!("invalid config json: {}", path.display()))?;
            require_objects(&value)
                .with_context(|| format!("invalid config json: {}", path.display()))?;
            serde_json::from_value::<GameConfig>(value)
                .with_context(|| format!("invalid config json: {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    let config = overrides.apply(config);
    config
        .validate()
        .map_err(|err| anyhow!("invalid game config: {err}"))?;
    Ok(config)
}

/// `#[serde(default)]` structs also deserialize from sequences, so the
/// document and each of its sections must be objects.
fn require_objects(value: &serde_json::Value) -> Result<()> {
    let document = value
        .as_object()
        .ok_or_else(|| anyhow!("config must be a json object"))?;
    for (section, body) in document {
        if !body.is_object() {
            return Err(anyhow!("config section `{section}` must be a json object"));
        }
    }
    Ok(())
}

pub fn parse_seed(seed: &str) -> Result<u32> {
    let s = seed.trim();
    if s.is_empty() {
        return Err(anyhow!("empty seed"));
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).with_context(|| format!("invalid hex seed: {s}"))
    } else {
        s.parse::<u32>()
            .with_context(|| format!("invalid decimal seed: {s}"))
    }
}

pub fn seed_to_hex(seed: u32) -> String {
    format!("0x{seed:08x}")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn parses_decimal_and_hex_seeds() {
        assert_eq!(parse_seed("42").unwrap(), 42);
        assert_eq!(parse_seed(" 0xDEADBEEF ").unwrap(), 0xDEAD_BEEF);
        assert!(parse_seed("").is_err());
        assert!(parse_seed("0xZZ").is_err());
        assert_eq!(seed_to_hex(0xBEEF), "0x0000beef");
    }

    #[test]
    fn env_overrides_skip_garbage_and_zero() {
        let overrides = EnvOverrides::from_lookup(lookup(&[
            (ENV_WIDTH, "800"),
            (ENV_HEIGHT, "0"),
            (ENV_SEED, "not-a-seed"),
        ]));

        assert_eq!(overrides.width, Some(800.0));
        assert_eq!(overrides.height, None);
        assert_eq!(overrides.seed, None);

        let config = overrides.apply(GameConfig::default());
        assert_eq!(config.playfield.width, 800.0);
        assert_eq!(config.playfield.height, 720.0);
    }

    #[test]
    fn env_seed_accepts_hex() {
        let overrides = EnvOverrides::from_lookup(lookup(&[(ENV_SEED, "0x10")]));
        assert_eq!(overrides.seed, Some(16));
    }

    #[test]
    fn defaults_without_a_file() {
        let config = load_config(None, &EnvOverrides::default()).unwrap();
        assert_eq!(config, GameConfig::default());
    }
}
