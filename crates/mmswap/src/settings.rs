//! Extraction settings.

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

/// Knobs for resolving and scanning a print file.
///
/// The defaults describe Bambu Studio / Orca style output. Every field can be
/// overridden from a TOML file; omitted keys keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSettings {
    /// Number of leading lines searched for filament metadata.
    pub header_window: usize,
    /// File name suffix that marks a zip container (case-insensitive).
    pub container_extension: String,
    /// Entry name suffix of the tool-path document inside a container.
    pub document_extension: String,
    /// Printer tag removed from filament profile names.
    pub vendor_suffix: String,
    /// Name of the placeholder filament when no colors are declared.
    pub fallback_filament_name: String,
    /// Color of the placeholder filament when no colors are declared.
    pub fallback_filament_color: String,
    /// Color used for swaps to a slot missing from the palette.
    pub unknown_slot_color: String,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            header_window: 2000,
            container_extension: ".3mf".into(),
            document_extension: ".gcode".into(),
            vendor_suffix: "@BBL A1M".into(),
            fallback_filament_name: "Unknown Filament".into(),
            fallback_filament_color: "#007AFF".into(),
            unknown_slot_color: "#cccccc".into(),
        }
    }
}

impl ExtractSettings {
    /// Parse settings from TOML text and validate them.
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Self =
            toml::from_str(text).map_err(|e| ExtractError::InvalidSettings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.header_window == 0 {
            return Err(ExtractError::InvalidSettings(
                "header_window must be positive".into(),
            ));
        }
        if self.container_extension.is_empty() {
            return Err(ExtractError::InvalidSettings(
                "container_extension must not be empty".into(),
            ));
        }
        if self.document_extension.is_empty() {
            return Err(ExtractError::InvalidSettings(
                "document_extension must not be empty".into(),
            ));
        }
        Ok(())
    }
}
