use std::{env, path::PathBuf};

use crate::audio::BAND_COUNT;
use crate::error::PlayerError;

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `ALLEGRO__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("ALLEGRO")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), PlayerError> {
        if self.audio.poll_interval_ms == 0 {
            return Err(PlayerError::Config(
                "audio.poll_interval_ms must be >= 1".to_string(),
            ));
        }
        if self.equalizer.gains.len() != BAND_COUNT {
            return Err(PlayerError::Config(format!(
                "equalizer.gains must have {BAND_COUNT} entries, got {}",
                self.equalizer.gains.len()
            )));
        }
        if !self.audio.volume.is_finite() || self.equalizer.gains.iter().any(|g| !g.is_finite()) {
            return Err(PlayerError::Config(
                "audio.volume and equalizer.gains must be finite numbers".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolve the config path from `ALLEGRO_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("ALLEGRO_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/allegro/config.toml`
/// or `~/.config/allegro/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("allegro").join("config.toml"))
}

/// Compute the default log file under `$XDG_STATE_HOME/allegro/allegro.log`
/// or `~/.local/state/allegro/allegro.log`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("allegro").join("allegro.log"))
}

/// Directory walked when no paths are given: `$XDG_MUSIC_DIR` or `~/Music`.
pub fn default_music_dir() -> Option<PathBuf> {
    xdg_dir("XDG_MUSIC_DIR", "Music")
}

fn xdg_dir(var: &str, home_relative: &str) -> Option<PathBuf> {
    if let Some(dir) = env::var_os(var) {
        Some(PathBuf::from(dir))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_relative))
    }
}
