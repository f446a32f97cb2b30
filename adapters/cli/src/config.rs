//! TOML configuration accepted through `--config`.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use space_shooter_rendering::{RenderContext, RenderingError};
use space_shooter_system_animator::AnimatorConfig;

/// Settings loaded from the configuration file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct CliConfig {
    /// Drive loop tuning.
    pub(crate) animator: AnimatorConfig,
    /// Scene geometry.
    pub(crate) render: RenderSettings,
}

impl CliConfig {
    /// Reads the configuration at `path`, or returns defaults when absent.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

/// Geometry overrides applied on top of the dark mode palette.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RenderSettings {
    pub(crate) cell_size: f32,
    pub(crate) cell_spacing: f32,
    pub(crate) padding: f32,
}

impl RenderSettings {
    pub(crate) fn context(&self) -> Result<RenderContext, RenderingError> {
        RenderContext::dark_mode().with_geometry(self.cell_size, self.cell_spacing, self.padding)
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        let context = RenderContext::dark_mode();
        Self {
            cell_size: context.cell_size,
            cell_spacing: context.cell_spacing,
            padding: context.padding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: CliConfig = toml::from_str("").expect("empty toml is valid");

        assert_eq!(config, CliConfig::default());
        assert_eq!(
            config.render.context().expect("defaults are valid"),
            RenderContext::dark_mode()
        );
    }

    #[test]
    fn sections_override_individual_fields() {
        let config: CliConfig = toml::from_str(
            "[animator]\nfinal_frames = 1\n\n[render]\ncell_size = 16.0\n",
        )
        .expect("valid toml");

        assert_eq!(config.animator.final_frames, 1);
        assert_eq!(config.animator.frame_duration_ms, 20);
        assert_eq!(config.render.cell_size, 16.0);
        assert_eq!(config.render.padding, 40.0);
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(toml::from_str::<CliConfig>("[renderer]\ncell_size = 4.0\n").is_err());
    }

    #[test]
    fn invalid_geometry_surfaces_rendering_error() {
        let settings = RenderSettings {
            cell_size: 0.0,
            ..RenderSettings::default()
        };

        assert_eq!(
            settings.context(),
            Err(RenderingError::InvalidCellSize { cell_size: 0.0 })
        );
    }

    #[test]
    fn missing_path_yields_defaults() {
        assert_eq!(CliConfig::load(None).expect("defaults"), CliConfig::default());
    }
}
