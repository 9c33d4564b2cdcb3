//! Filament metadata from the slicer's config comment block.
//!
//! Bambu Studio and Orca write the print profile as `; key = value` comments.
//! Two keys matter here:
//!
//! ```text
//! ; filament_colour = #FFFFFF;#000000;#FF0000
//! ; filament_settings_id = "Bambu PLA Basic @BBL A1M";"Bambu PETG HF @BBL A1M"
//! ```

use crate::job::Filament;
use crate::settings::ExtractSettings;

/// Color-list directive.
pub const COLOR_DIRECTIVE: &str = "; filament_colour =";
/// Name-list directive.
pub const NAME_DIRECTIVE: &str = "; filament_settings_id =";

/// Raw lists collected from the header window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMetadata {
    /// Colors, one per slot.
    pub colors: Vec<String>,
    /// Cleaned profile names, aligned with `colors` by position.
    pub names: Vec<String>,
}

/// Text after the first `=`.
fn directive_value(line: &str) -> &str {
    line.split_once('=').map_or("", |(_, value)| value).trim()
}

fn parse_colors(line: &str) -> Vec<String> {
    directive_value(line)
        .split(';')
        .map(|c| c.trim().to_string())
        .collect()
}

fn parse_names(line: &str, vendor_suffix: &str) -> Vec<String> {
    directive_value(line)
        .split(';')
        .map(|n| {
            let unquoted = n.trim().replace('"', "");
            let stripped = if vendor_suffix.is_empty() {
                unquoted
            } else {
                unquoted.replacen(vendor_suffix, "", 1)
            };
            stripped.trim().to_string()
        })
        .collect()
}

/// Collect the color and name lists from the first `header_window` lines.
///
/// A later directive in the window replaces an earlier one.
pub fn scan_header<'a, I>(lines: I, settings: &ExtractSettings) -> HeaderMetadata
where
    I: IntoIterator<Item = &'a str>,
{
    let mut meta = HeaderMetadata::default();
    for raw in lines.into_iter().take(settings.header_window) {
        let line = raw.trim();
        if line.starts_with(COLOR_DIRECTIVE) {
            meta.colors = parse_colors(line);
        } else if line.starts_with(NAME_DIRECTIVE) {
            meta.names = parse_names(line, &settings.vendor_suffix);
        }
    }
    meta
}

/// Build the palette from collected metadata.
///
/// Without a color list the palette is a single placeholder filament.
pub fn build_palette(meta: &HeaderMetadata, settings: &ExtractSettings) -> Vec<Filament> {
    if meta.colors.is_empty() {
        return vec![Filament::new(
            0,
            settings.fallback_filament_name.clone(),
            settings.fallback_filament_color.clone(),
        )];
    }

    meta.colors
        .iter()
        .enumerate()
        .map(|(i, color)| {
            let name = match meta.names.get(i) {
                Some(name) if !name.is_empty() => name.clone(),
                _ => format!("Filament {}", i + 1),
            };
            Filament::new(i, name, color.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette_of(text: &str) -> Vec<Filament> {
        let settings = ExtractSettings::default();
        let meta = scan_header(text.split('\n'), &settings);
        build_palette(&meta, &settings)
    }

    #[test]
    fn placeholder_without_colors() {
        let palette = palette_of("; generated by test\nG28\n");
        assert_eq!(palette, vec![Filament::new(0, "Unknown Filament", "#007AFF")]);
    }

    #[test]
    fn names_are_cleaned_and_aligned() {
        let palette = palette_of(
            "; filament_colour = #FFFFFF; #000000 ;#FF0000\n\
             ; filament_settings_id = \"Bambu PLA Basic @BBL A1M\";\"PETG HF @BBL A1M\"\n",
        );
        assert_eq!(palette.len(), 3);
        assert_eq!(palette[0], Filament::new(0, "Bambu PLA Basic", "#FFFFFF"));
        assert_eq!(palette[1], Filament::new(1, "PETG HF", "#000000"));
        assert_eq!(palette[2], Filament::new(2, "Filament 3", "#FF0000"));
    }

    #[test]
    fn empty_name_falls_back() {
        let palette = palette_of(
            "; filament_colour = #111111;#222222\n\
             ; filament_settings_id = \"\";\"Silk\"\n",
        );
        assert_eq!(palette[0].display_name, "Filament 1");
        assert_eq!(palette[1].display_name, "Silk");
    }

    #[test]
    fn indented_directive_is_recognized() {
        let palette = palette_of("   ; filament_colour = #ABCDEF   \n");
        assert_eq!(palette, vec![Filament::new(0, "Filament 1", "#ABCDEF")]);
    }

    #[test]
    fn later_directive_replaces_earlier() {
        let palette = palette_of(
            "; filament_colour = #111111\n\
             ; filament_colour = #222222;#333333\n",
        );
        assert_eq!(palette.len(), 2);
        assert_eq!(palette[0].color, "#222222");
    }

    #[test]
    fn directive_outside_window_is_ignored() {
        let settings = ExtractSettings {
            header_window: 2,
            ..Default::default()
        };
        let text = "G28\nG1 Z0.2\n; filament_colour = #FF0000\n";
        let meta = scan_header(text.split('\n'), &settings);
        assert!(meta.colors.is_empty());
        assert_eq!(build_palette(&meta, &settings).len(), 1);
    }

    #[test]
    fn other_keys_do_not_match() {
        let meta = scan_header(
            ["; filament_colour_type = 0;0", "; default_filament_colour = ;"],
            &ExtractSettings::default(),
        );
        assert!(meta.colors.is_empty());
    }
}
