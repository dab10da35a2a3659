//! Game settings and preferences
//!
//! Persisted in LocalStorage. Scores are never stored.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Stars in the sky backdrop
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => 40,
            QualityPreset::Medium => 100,
            QualityPreset::High => 160,
        }
    }

    /// Point lights attached to nearby special pickups
    pub fn item_lights(&self) -> usize {
        match self {
            QualityPreset::Low => 0,
            QualityPreset::Medium | QualityPreset::High => 2,
        }
    }

    /// Whether the distant mountain mesh is drawn
    pub fn terrain_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    /// Red sky flash on the frame the player gets hit
    pub hit_flash: bool,

    /// Show FPS counter
    pub show_fps: bool,

    /// Reduced motion (no flashes, twinkle or wobble)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            hit_flash: true,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Apply a `?quality=high` style override from a URL query string.
    /// Returns the preset that was applied, if any.
    pub fn apply_query(&mut self, query: &str) -> Option<QualityPreset> {
        let preset = query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .filter(|(key, _)| *key == "quality")
            .find_map(|(_, value)| QualityPreset::parse(value))?;
        self.quality = preset;
        Some(preset)
    }

    /// Effective hit flash (respects reduced_motion)
    pub fn effective_hit_flash(&self) -> bool {
        self.hit_flash && !self.reduced_motion
    }

    /// Effective idle animation (twinkle, bobbing, wobble)
    pub fn animate_idle(&self) -> bool {
        !self.reduced_motion
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "sleigh_chase_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preset() {
        assert_eq!(QualityPreset::parse("LOW"), Some(QualityPreset::Low));
        assert_eq!(QualityPreset::parse("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }

    #[test]
    fn test_query_overrides_quality() {
        let mut settings = Settings::default();
        assert_eq!(settings.apply_query("?seed=4&quality=HIGH"), Some(QualityPreset::High));
        assert_eq!(settings.quality, QualityPreset::High);

        assert_eq!(settings.apply_query("?quality=ultra"), None);
        assert_eq!(settings.apply_query(""), None);
        assert_eq!(settings.apply_query("?quality"), None);
        assert_eq!(settings.quality, QualityPreset::High);

        assert_eq!(settings.apply_query("quality=low"), Some(QualityPreset::Low));
        assert_eq!(settings.quality.star_count(), 40);
    }

    #[test]
    fn test_reduced_motion_overrides_flash() {
        let mut settings = Settings::default();
        assert!(settings.effective_hit_flash());
        settings.reduced_motion = true;
        assert!(!settings.effective_hit_flash());
        assert!(!settings.animate_idle());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"quality":"Low"}"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(settings.hit_flash);
        assert_eq!(settings.quality.item_lights(), 0);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            show_fps: true,
            ..Settings::from_preset(QualityPreset::High)
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
