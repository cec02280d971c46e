//! Per-surface tuning. Desktop and mobile surfaces run the same engine with
//! different presets.

use crate::BRANDS;

/// Which page surface an engine instance drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// Canvas embedded in the game section.
    Desktop,
    /// Fullscreen popup canvas, mounted only while the popup is open.
    Mobile,
}

impl Variant {
    pub fn parse(name: &str) -> Option<Variant> {
        match name.trim().to_ascii_lowercase().as_str() {
            "desktop" => Some(Variant::Desktop),
            "mobile" => Some(Variant::Mobile),
            _ => None,
        }
    }

    pub fn config(self) -> EngineConfig {
        match self {
            Variant::Desktop => EngineConfig::desktop(),
            Variant::Mobile => EngineConfig::mobile(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Edge length of one grid cell in CSS pixels.
    pub cell_size: u32,
    /// Milliseconds between ticks while running.
    pub tick_ms: u32,
    pub score_per_food: u32,
    /// Environmental cost added per brand eaten (kg of CO2 on the page).
    pub impact_per_food: u32,
    /// Minimum finger travel before a touch counts as a swipe.
    pub swipe_threshold_px: f64,
    /// Number of distinct brand marks food can take.
    pub brand_count: usize,
    /// Random rolls tried before falling back to a scan of free cells.
    pub food_retry_limit: u32,
    /// CSS selector of elements that never trigger click-outside pausing.
    pub control_selector: String,
}

impl EngineConfig {
    pub fn desktop() -> Self {
        Self {
            cell_size: 25,
            tick_ms: 100,
            score_per_food: 10,
            impact_per_food: 15,
            swipe_threshold_px: 30.0,
            brand_count: BRANDS.len(),
            food_retry_limit: 64,
            control_selector: "[data-game-control], button[title=\"Pause Game\"]".to_string(),
        }
    }

    pub fn mobile() -> Self {
        Self { cell_size: 20, tick_ms: 120, ..Self::desktop() }
    }

    /// Apply a JSON object of overrides on top of this preset. Missing fields
    /// keep their preset values.
    #[cfg(feature = "serde_json")]
    pub fn with_overrides(&self, json: &str) -> Result<Self, serde_json::Error> {
        let mut merged = serde_json::to_value(self)?;
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        if let (Some(base), serde_json::Value::Object(patch)) =
            (merged.as_object_mut(), overrides)
        {
            for (key, value) in patch {
                base.insert(key, value);
            }
        }
        serde_json::from_value(merged)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ_only_in_surface_tuning() {
        let desktop = EngineConfig::desktop();
        let mobile = EngineConfig::mobile();
        assert_eq!(desktop.tick_ms, 100);
        assert_eq!(mobile.tick_ms, 120);
        assert_eq!(desktop.score_per_food, mobile.score_per_food);
        assert_eq!(desktop.impact_per_food, mobile.impact_per_food);
        assert_eq!(desktop.brand_count, BRANDS.len());
    }

    #[test]
    fn variant_names() {
        assert_eq!(Variant::parse("Mobile"), Some(Variant::Mobile));
        assert_eq!(Variant::parse("desktop").map(Variant::config), Some(EngineConfig::desktop()));
        assert_eq!(Variant::parse("tablet"), None);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn overrides_keep_unspecified_fields() {
        let cfg = EngineConfig::mobile().with_overrides(r#"{"tick_ms": 80}"#).unwrap();
        assert_eq!(cfg.tick_ms, 80);
        assert_eq!(cfg.cell_size, 20);
        assert!(EngineConfig::desktop().with_overrides("[1,2]").is_ok());
        assert!(EngineConfig::desktop().with_overrides(r#"{"tick_ms": "fast"}"#).is_err());
    }
}
