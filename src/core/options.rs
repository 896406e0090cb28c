use super::framing::FramingConfig;
use super::helix::HelixParams;
use super::hit::HitConfig;
use super::scroll::SpringParams;
use crate::error::NavResult;
use serde::Deserialize;

/// Mount-time configuration. Every field is optional on the JS side.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneOptions {
    /// Freeze time, suppress scroll rotation, project once per resize and
    /// widen the fallback radius.
    pub deterministic: bool,
    /// Diagnostics sink on/off. `None` follows the build profile.
    pub diagnostics: Option<bool>,
    /// `None` defers to the `prefers-reduced-motion` media query.
    pub reduced_motion: Option<bool>,
    /// Element that receives pointer events, when it differs from the canvas.
    pub event_source_id: Option<String>,
    pub projection_hz: f64,
    pub helix: HelixParams,
    pub spring: SpringParams,
    pub framing: FramingConfig,
    pub hit: HitConfig,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            deterministic: false,
            diagnostics: None,
            reduced_motion: None,
            event_source_id: None,
            projection_hz: 10.0,
            helix: HelixParams::default(),
            spring: SpringParams::default(),
            framing: FramingConfig::default(),
            hit: HitConfig::default(),
        }
    }
}

impl SceneOptions {
    /// Parse from JSON text; empty or `null` input yields the defaults.
    pub fn from_json(text: &str) -> NavResult<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "null" || trimmed == "undefined" {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(trimmed)?)
    }

    pub fn diagnostics_enabled(&self) -> bool {
        self.diagnostics
            .unwrap_or(cfg!(debug_assertions) || self.deterministic)
    }
}
