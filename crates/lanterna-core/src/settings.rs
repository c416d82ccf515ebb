// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Tunables of the painter and the dirty region tracker.
//!
//! Sources are layered from lowest to highest precedence: [`Default`], a JSON
//! document, then `LANTERNA_*` environment variables.

use crate::math::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest accepted dirty region capacity.
pub const MAX_DIRTY_REGIONS_LIMIT: usize = 15;

/// A collection of settings that drive every painter of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PainterSettings {
    /// If `false`, every pulse repaints the whole surface.
    pub dirty_opts: bool,
    /// Maximum number of separate dirty regions before falling back to a full redraw.
    pub max_dirty_regions: usize,
    /// A changed area larger than this fraction of the surface forces a full redraw.
    pub full_redraw_area_ratio: f32,
    /// Gap, in logical units, under which two dirty regions are merged.
    pub region_merge_tolerance: f32,
    /// If `true`, each region only redraws the subtree above its topmost opaque cover.
    pub occlusion_culling: bool,
    /// Outlines each repainted region. Debug aid.
    pub show_dirty_regions: bool,
    /// Color a full redraw starts from.
    pub clear_color: Color,
    /// Consecutive failed pulses after which a scene is reported unrenderable.
    pub unrenderable_warn_after: u32,
    /// If `true`, a pulse waits for the previous pulse's render jobs before submitting new ones.
    pub wait_for_render: bool,
}

impl Default for PainterSettings {
    fn default() -> Self {
        Self {
            dirty_opts: true,
            max_dirty_regions: 6,
            full_redraw_area_ratio: 0.75,
            region_merge_tolerance: 1.0,
            occlusion_culling: true,
            show_dirty_regions: false,
            clear_color: Color::WHITE,
            unrenderable_warn_after: 30,
            wait_for_render: true,
        }
    }
}

impl PainterSettings {
    /// Parses settings from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Applies the `LANTERNA_*` process environment on top of `self`.
    pub fn with_env_overrides(self) -> Result<Self, SettingsError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up through `lookup` on top of `self`.
    ///
    /// Recognized keys: `LANTERNA_DIRTY_OPTS`, `LANTERNA_MAX_DIRTY_REGIONS`,
    /// `LANTERNA_SHOW_DIRTY`, `LANTERNA_OCCLUSION_CULLING`.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("LANTERNA_DIRTY_OPTS") {
            self.dirty_opts = parse_flag("LANTERNA_DIRTY_OPTS", &value)?;
        }
        if let Some(value) = lookup("LANTERNA_MAX_DIRTY_REGIONS") {
            self.max_dirty_regions =
                value
                    .trim()
                    .parse()
                    .map_err(|_| SettingsError::InvalidValue {
                        key: "LANTERNA_MAX_DIRTY_REGIONS".to_string(),
                        value: value.clone(),
                    })?;
        }
        if let Some(value) = lookup("LANTERNA_SHOW_DIRTY") {
            self.show_dirty_regions = parse_flag("LANTERNA_SHOW_DIRTY", &value)?;
        }
        if let Some(value) = lookup("LANTERNA_OCCLUSION_CULLING") {
            self.occlusion_culling = parse_flag("LANTERNA_OCCLUSION_CULLING", &value)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Checks every value against its accepted range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(1..=MAX_DIRTY_REGIONS_LIMIT).contains(&self.max_dirty_regions) {
            return Err(SettingsError::OutOfRange {
                field: "max_dirty_regions",
                detail: format!(
                    "{} is not in 1..={MAX_DIRTY_REGIONS_LIMIT}",
                    self.max_dirty_regions
                ),
            });
        }
        if !(self.full_redraw_area_ratio > 0.0 && self.full_redraw_area_ratio <= 1.0) {
            return Err(SettingsError::OutOfRange {
                field: "full_redraw_area_ratio",
                detail: format!("{} is not in (0, 1]", self.full_redraw_area_ratio),
            });
        }
        if !(self.region_merge_tolerance.is_finite() && self.region_merge_tolerance >= 0.0) {
            return Err(SettingsError::OutOfRange {
                field: "region_merge_tolerance",
                detail: format!("{} is not a non-negative number", self.region_merge_tolerance),
            });
        }
        if self.unrenderable_warn_after == 0 {
            return Err(SettingsError::OutOfRange {
                field: "unrenderable_warn_after",
                detail: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, SettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// An error raised while loading or validating [`PainterSettings`].
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// The JSON document could not be parsed.
    Parse(String),
    /// An environment override could not be interpreted.
    InvalidValue {
        /// The variable name.
        key: String,
        /// The raw value.
        value: String,
    },
    /// A field holds a value outside its accepted range.
    OutOfRange {
        /// The field name.
        field: &'static str,
        /// What is wrong with it.
        detail: String,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Parse(msg) => write!(f, "Failed to parse painter settings: {msg}"),
            SettingsError::InvalidValue { key, value } => {
                write!(f, "Invalid value '{value}' for {key}")
            }
            SettingsError::OutOfRange { field, detail } => {
                write!(f, "Painter setting '{field}' out of range: {detail}")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let settings = PainterSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.max_dirty_regions, 6);
        assert!(settings.dirty_opts);
        assert!(!settings.show_dirty_regions);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            PainterSettings::from_json_str(r#"{ "max_dirty_regions": 3, "show_dirty_regions": true }"#)
                .expect("valid json");
        assert_eq!(settings.max_dirty_regions, 3);
        assert!(settings.show_dirty_regions);
        assert_eq!(settings.clear_color, Color::WHITE);
        assert!(settings.wait_for_render);
    }

    #[test]
    fn test_json_out_of_range_is_rejected() {
        let err = PainterSettings::from_json_str(r#"{ "max_dirty_regions": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::OutOfRange {
                field: "max_dirty_regions",
                ..
            }
        ));

        let err = PainterSettings::from_json_str(r#"{ "full_redraw_area_ratio": 1.5 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::OutOfRange { .. }));

        assert!(matches!(
            PainterSettings::from_json_str("not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let base = PainterSettings::from_json_str(r#"{ "dirty_opts": true }"#).expect("valid json");
        let settings = base
            .with_overrides_from(lookup(&[
                ("LANTERNA_DIRTY_OPTS", "false"),
                ("LANTERNA_MAX_DIRTY_REGIONS", " 12 "),
                ("LANTERNA_SHOW_DIRTY", "ON"),
            ]))
            .expect("overrides are valid");
        assert!(!settings.dirty_opts);
        assert_eq!(settings.max_dirty_regions, 12);
        assert!(settings.show_dirty_regions);
        assert!(settings.occlusion_culling);
    }

    #[test]
    fn test_bad_override_is_reported() {
        let err = PainterSettings::default()
            .with_overrides_from(lookup(&[("LANTERNA_OCCLUSION_CULLING", "maybe")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value 'maybe' for LANTERNA_OCCLUSION_CULLING"
        );

        let err = PainterSettings::default()
            .with_overrides_from(lookup(&[("LANTERNA_MAX_DIRTY_REGIONS", "16")]))
            .unwrap_err();
        assert!(matches!(err, SettingsError::OutOfRange { .. }));
    }
}
