use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const KEY_RES_WIDTH: &str = "Graphics.ResolutionWidth";
pub const KEY_RES_HEIGHT: &str = "Graphics.ResolutionHeight";
pub const KEY_SCALE: &str = "Graphics.ScaleFactor";
pub const KEY_FULLSCREEN: &str = "Graphics.Fullscreen";
pub const KEY_EDITOR: &str = "Graphics.IsEditor";

/// Name of the config file inside the config directory
pub const CONFIG_FILE: &str = "options.cnf";

/// A typed config value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Int(i32),
    Bool(bool),
}

impl ConfigValue {
    /// Serialize to `TYPE:value`
    pub fn serialize(&self) -> String {
        match self {
            ConfigValue::Int(v) => format!("INT32:{}", v),
            ConfigValue::Bool(v) => format!("BOOLEAN:{}", v),
        }
    }

    /// Parse a `TYPE:value` descriptor
    pub fn parse(s: &str) -> Result<Self> {
        let (ty, value) = s
            .split_once(':')
            .with_context(|| format!("Missing type prefix in '{}'", s))?;
        match ty.trim() {
            "INT32" => Ok(ConfigValue::Int(
                value.trim().parse().context("Invalid integer value")?,
            )),
            "BOOLEAN" => match value.trim() {
                "true" => Ok(ConfigValue::Bool(true)),
                "false" => Ok(ConfigValue::Bool(false)),
                other => bail!("Invalid boolean value '{}'", other),
            },
            other => bail!("Unknown value type '{}'", other),
        }
    }
}

/// Typed key/value settings store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    values: BTreeMap<String, ConfigValue>,
}

impl Default for Config {
    fn default() -> Self {
        let mut config = Self {
            values: BTreeMap::new(),
        };
        config.set_int(KEY_RES_WIDTH, 320);
        config.set_int(KEY_RES_HEIGHT, 240);
        config.set_int(KEY_SCALE, 2);
        config.set_bool(KEY_FULLSCREEN, false);
        config.set_bool(KEY_EDITOR, false);
        config
    }
}

impl Config {
    /// Integer value, 0 if missing or not an integer
    pub fn get_int(&self, key: &str) -> i32 {
        match self.values.get(key) {
            Some(ConfigValue::Int(v)) => *v,
            _ => 0,
        }
    }

    /// Boolean value, false if missing or not a boolean
    pub fn get_bool(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(ConfigValue::Bool(true)))
    }

    pub fn set_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_string(), ConfigValue::Int(value));
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_string(), ConfigValue::Bool(value));
    }

    /// Parse `key = TYPE:value` lines over the current values.
    /// Blank lines and `#` comments are ignored.
    pub fn merge_str(&mut self, content: &str) -> Result<()> {
        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .with_context(|| format!("line {}: expected 'key = TYPE:value'", lineno + 1))?;
            let value = ConfigValue::parse(value.trim())
                .with_context(|| format!("line {}: bad value for '{}'", lineno + 1, key.trim()))?;
            self.values.insert(key.trim().to_string(), value);
        }
        Ok(())
    }

    /// Serialize all values, sorted by key
    pub fn to_config_string(&self) -> String {
        self.values
            .iter()
            .map(|(key, value)| format!("{} = {}\n", key, value.serialize()))
            .collect()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, self.to_config_string())
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Path of the config file for an optional config directory
pub fn config_path(config_dir: &Option<String>) -> PathBuf {
    match config_dir {
        Some(dir) => Path::new(dir).join(CONFIG_FILE),
        None => PathBuf::from(CONFIG_FILE),
    }
}

/// Load the config file, falling back to defaults when it does not exist
pub fn load_config(config_dir: &Option<String>) -> Result<Config> {
    let path = config_path(config_dir);
    let mut config = Config::default();
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(config);
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    config
        .merge_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

/// Resolution parsed from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: i32,
    pub height: i32,
}

/// Parse a resolution string in the format "WIDTHxHEIGHT"
pub fn parse_resolution(s: &str) -> Result<Resolution> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        bail!("Resolution must be in WIDTHxHEIGHT format");
    }

    let width: i32 = parts[0].parse().context("Invalid width value")?;
    let height: i32 = parts[1].parse().context("Invalid height value")?;

    if width <= 0 || height <= 0 {
        bail!("Resolution values must be positive");
    }

    Ok(Resolution { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolution_valid() {
        let res = parse_resolution("640x480").unwrap();
        assert_eq!(res.width, 640);
        assert_eq!(res.height, 480);
    }

    #[test]
    fn test_parse_resolution_invalid_format() {
        assert!(parse_resolution("640-480").is_err());
        assert!(parse_resolution("640x480x120").is_err());
    }

    #[test]
    fn test_parse_resolution_invalid_values() {
        assert!(parse_resolution("0x480").is_err());
        assert!(parse_resolution("640x-1").is_err());
        assert!(parse_resolution("abcxdef").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.get_int(KEY_RES_WIDTH), 320);
        assert_eq!(config.get_int(KEY_RES_HEIGHT), 240);
        assert_eq!(config.get_int(KEY_SCALE), 2);
        assert!(!config.get_bool(KEY_FULLSCREEN));
        assert!(!config.get_bool(KEY_EDITOR));
    }

    #[test]
    fn test_typed_get_mismatch() {
        let mut config = Config::default();
        config.set_bool("Game.Sound", true);
        assert_eq!(config.get_int("Game.Sound"), 0);
        assert!(!config.get_bool(KEY_RES_WIDTH));
        assert_eq!(config.get_int("Missing"), 0);
        assert!(!config.get_bool("Missing"));
    }

    #[test]
    fn test_merge_str() {
        let mut config = Config::default();
        config
            .merge_str(
                "# comment\n\nGraphics.ResolutionWidth = INT32:640\nGraphics.Fullscreen = BOOLEAN:true\n",
            )
            .unwrap();
        assert_eq!(config.get_int(KEY_RES_WIDTH), 640);
        assert_eq!(config.get_int(KEY_RES_HEIGHT), 240);
        assert!(config.get_bool(KEY_FULLSCREEN));
    }

    #[test]
    fn test_merge_str_errors() {
        let mut config = Config::default();
        assert!(config.merge_str("no equals sign").is_err());
        assert!(config.merge_str("a = 12").is_err());
        assert!(config.merge_str("a = INT32:twelve").is_err());
        assert!(config.merge_str("a = BOOLEAN:yes").is_err());
        assert!(config.merge_str("a = FLOAT:1.0").is_err());
        assert!(config.merge_str("a = STRING:dogs").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let dir_opt = Some(dir.path().to_string_lossy().into_owned());

        let mut config = Config::default();
        config.set_int(KEY_RES_WIDTH, 400);
        config.set_int(KEY_RES_HEIGHT, 300);
        config.set_bool(KEY_FULLSCREEN, true);
        config.save(&config_path(&dir_opt)).unwrap();

        let loaded = load_config(&dir_opt).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let dir_opt = Some(dir.path().join("absent").to_string_lossy().into_owned());
        assert_eq!(load_config(&dir_opt).unwrap(), Config::default());
    }

    #[test]
    fn test_serialized_form() {
        let config = Config::default();
        let text = config.to_config_string();
        assert!(text.contains("Graphics.ResolutionWidth = INT32:320\n"));
        assert!(text.contains("Graphics.Fullscreen = BOOLEAN:false\n"));
    }
}
