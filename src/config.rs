use serde::{Deserialize, Deserializer};
use std::env;
use std::fs;

use crate::error::{BotError, Result};

const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Clone, Debug)]
pub struct Config {
    pub token: String,
    pub node: NodeConfig,
    pub embed: EmbedConfig,
    pub geolocation: GeolocationConfig,
}

/// The node this bot reports on, and the slash command it answers to.
#[derive(Clone, Debug, Deserialize)]
pub struct NodeConfig {
    pub command: String,
    pub name: String,
    pub hostname: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmbedConfig {
    #[serde(deserialize_with = "deserialize_color")]
    pub color: u32,
    pub title: String,
    pub logo: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GeolocationConfig {
    /// `None` leaves the lookup without a timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize)]
struct FileConfig {
    node: NodeConfig,
    embed: EmbedConfig,
    #[serde(default)]
    geolocation: GeolocationConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TOKEN")
            .map_err(|_| BotError::Config("TOKEN not configured".to_string()))?;
        let path = env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let json = fs::read_to_string(&path).map_err(|e| {
            BotError::Config(format!("Failed to read config file '{}': {}", path, e))
        })?;

        Self::from_json(token, &json)
    }

    pub fn from_json(token: String, json: &str) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(BotError::Config("TOKEN is empty".to_string()));
        }

        let file: FileConfig = serde_json::from_str(json)
            .map_err(|e| BotError::Config(format!("Invalid config file: {}", e)))?;

        Ok(Self {
            token,
            node: file.node,
            embed: file.embed,
            geolocation: file.geolocation,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawColor {
    Number(u32),
    Hex(String),
}

fn deserialize_color<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    match RawColor::deserialize(deserializer)? {
        RawColor::Number(n) => Ok(n),
        RawColor::Hex(s) => parse_hex_color(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{}'", s))),
    }
}

fn parse_hex_color(s: &str) -> Option<u32> {
    let s = s.trim();
    let digits = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    if digits.is_empty() || digits.len() > 6 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}
