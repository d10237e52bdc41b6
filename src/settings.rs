use crate::model::Color;
use serde::{Deserialize, Serialize};

fn default_grid_color() -> Color {
    Color::rgba(70, 70, 78, 255)
}

fn default_label_color() -> Color {
    Color::rgba(170, 170, 178, 255)
}

fn default_line_color() -> Color {
    Color::rgba(110, 160, 255, 255)
}

fn default_normal_point_color() -> Color {
    Color::rgba(220, 220, 220, 255)
}

fn default_hover_point_color() -> Color {
    Color::rgba(255, 210, 90, 255)
}

fn default_selected_point_color() -> Color {
    Color::rgba(255, 120, 90, 255)
}

fn default_hit_radius() -> f32 {
    5.0
}

fn default_padding() -> i32 {
    4
}

fn default_band_alpha_divisor() -> u8 {
    2
}

/// Appearance and interaction tuning for the curve editor. Missing fields in
/// the settings file fall back to the defaults, so old files keep loading
/// after new options appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default = "default_grid_color")]
    pub grid_color: Color,
    #[serde(default = "default_label_color")]
    pub label_color: Color,
    #[serde(default = "default_line_color")]
    pub line_color: Color,
    #[serde(default = "default_normal_point_color")]
    pub normal_point_color: Color,
    #[serde(default = "default_hover_point_color")]
    pub hover_point_color: Color,
    #[serde(default = "default_selected_point_color")]
    pub selected_point_color: Color,
    /// Pointer distance in pixels within which a marker counts as hit; also
    /// the marker's outer radius.
    #[serde(default = "default_hit_radius")]
    pub hit_radius: f32,
    #[serde(default = "default_padding")]
    pub padding: i32,
    /// The variation band reuses the line color with its alpha divided by
    /// this.
    #[serde(default = "default_band_alpha_divisor")]
    pub band_alpha_divisor: u8,
    /// When enabled the demo binary initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            grid_color: default_grid_color(),
            label_color: default_label_color(),
            line_color: default_line_color(),
            normal_point_color: default_normal_point_color(),
            hover_point_color: default_hover_point_color(),
            selected_point_color: default_selected_point_color(),
            hit_radius: default_hit_radius(),
            padding: default_padding(),
            band_alpha_divisor: default_band_alpha_divisor(),
            debug_logging: false,
        }
    }
}

impl EditorSettings {
    pub fn band_color(&self) -> Color {
        let divisor = self.band_alpha_divisor.max(1);
        self.line_color.with_alpha(self.line_color.a / divisor)
    }

    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
