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

//! Loads [`PainterSettings`] from a JSON file and the environment.
//!
//! Precedence, lowest first: built-in defaults, the file, `LANTERNA_*`
//! environment variables.

use anyhow::{Context, Result};
use lanterna_core::PainterSettings;
use std::path::Path;

/// Loads painter settings.
///
/// ## Arguments
/// * `path` - Optional JSON settings file. `None` starts from the defaults.
///
/// ## Returns
/// The merged and validated settings, or an error naming the file or
/// variable at fault.
pub fn load_painter_settings(path: Option<&Path>) -> Result<PainterSettings> {
    load_painter_settings_with(path, |key| std::env::var(key).ok())
}

/// Same as [`load_painter_settings`], reading overrides through `lookup`.
pub fn load_painter_settings_with<F>(path: Option<&Path>, lookup: F) -> Result<PainterSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings file {}", path.display()))?;
            let settings = PainterSettings::from_json_str(&text)
                .with_context(|| format!("Invalid settings file {}", path.display()))?;
            log::info!("Loaded painter settings from {}", path.display());
            settings
        }
        None => PainterSettings::default(),
    };

    base.with_overrides_from(lookup)
        .context("Invalid LANTERNA_* environment override")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "lanterna-config-{}-{name}.json",
            std::process::id()
        ));
        std::fs::write(&path, contents).expect("write temp settings");
        path
    }

    #[test]
    fn test_defaults_without_file() {
        let settings = load_painter_settings_with(None, |_| None).expect("defaults load");
        assert_eq!(settings.max_dirty_regions, 6);
        assert!(settings.dirty_opts);
    }

    #[test]
    fn test_file_then_environment_precedence() {
        let path = temp_file("precedence", r#"{ "max_dirty_regions": 4, "show_dirty_regions": true }"#);
        let settings = load_painter_settings_with(Some(&path), |key| {
            (key == "LANTERNA_MAX_DIRTY_REGIONS").then(|| "8".to_string())
        })
        .expect("settings load");
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.max_dirty_regions, 8);
        assert!(settings.show_dirty_regions);
    }

    #[test]
    fn test_errors_name_the_file() {
        let missing = std::env::temp_dir().join("lanterna-config-does-not-exist.json");
        let err = load_painter_settings_with(Some(&missing), |_| None).unwrap_err();
        assert!(err.to_string().contains("lanterna-config-does-not-exist.json"));

        let path = temp_file("broken", "{ not json");
        let err = load_painter_settings_with(Some(&path), |_| None).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().starts_with("Invalid settings file"));
    }
}
