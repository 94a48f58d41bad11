use crate::error::{Result, TerraMindError};
use dialoguer::Input;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub farm: FarmConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FarmConfig {
    pub name: String,
    /// Fallback coordinates for `plot add` when none are given
    pub default_latitude: Option<f64>,
    pub default_longitude: Option<f64>,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            name: "My Farm".into(),
            default_latitude: None,
            default_longitude: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Fixed seed for the synthetic index estimator. Leave unset for a
    /// fresh estimate each run; set it for reproducible output.
    pub seed: Option<u64>,
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(TerraMindError::Config(format!(
                "Config file not found at {:?}. Run `terramind init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| TerraMindError::Config(format!("Failed to read config: {}", e)))?;

        // Substitute environment variables
        let config_str = Self::substitute_env_vars(&config_str);

        let config: Config = serde_yaml::from_str(&config_str)
            .map_err(|e| TerraMindError::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Like `load`, but a missing file falls back to defaults. None of the
    /// commands strictly require configuration.
    pub fn load_or_default(config_override: Option<PathBuf>) -> Self {
        match Self::load(config_override) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!("No config loaded ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        // Try current directory first
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        // Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("terramind").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        // Return XDG path as the default (will trigger "not found" in load)
        let default_path = dirs::config_dir()
            .ok_or_else(|| TerraMindError::Config("Cannot determine config directory".into()))?
            .join("terramind")
            .join("config.yaml");
        Ok(default_path)
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/terramind/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TerraMindError::Config("Cannot determine config directory".into()))?
            .join("terramind");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up TerraMind!");
        println!();

        println!("Farm Profile");
        let farm_name: String = Input::new()
            .with_prompt("  Farm name")
            .default("My Farm".into())
            .interact_text()
            .map_err(|e| TerraMindError::Config(format!("Input error: {}", e)))?;

        let default_latitude: f64 = Input::new()
            .with_prompt("  Default latitude")
            .default(0.0)
            .interact_text()
            .map_err(|e| TerraMindError::Config(format!("Input error: {}", e)))?;

        let default_longitude: f64 = Input::new()
            .with_prompt("  Default longitude")
            .default(0.0)
            .interact_text()
            .map_err(|e| TerraMindError::Config(format!("Input error: {}", e)))?;

        println!();

        println!("Analysis (leave seed at 0 for fresh estimates each run)");
        let seed: u64 = Input::new()
            .with_prompt("  Estimator seed")
            .default(0)
            .interact_text()
            .map_err(|e| TerraMindError::Config(format!("Input error: {}", e)))?;

        println!();

        let config = Config {
            farm: FarmConfig {
                name: farm_name,
                default_latitude: Some(default_latitude),
                default_longitude: Some(default_longitude),
            },
            analysis: AnalysisConfig {
                seed: if seed == 0 { None } else { Some(seed) },
            },
        };

        // Write to default config path
        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| TerraMindError::Config(format!("Failed to serialize config: {}", e)))?;

        // Write with a header comment
        let content = format!(
            "# TerraMind Configuration\n# Generated by `terramind init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        // Find all ${VAR_NAME} patterns and substitute
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        // CLI override takes priority
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        // Then check env var
        if let Ok(dir) = std::env::var("TERRAMIND_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        // Use XDG data directory
        let data_dir = dirs::data_dir()
            .ok_or_else(|| TerraMindError::Config("Cannot determine data directory".into()))?
            .join("terramind");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("terramind.db"))
    }
}
