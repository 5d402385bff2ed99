//! Theme resolution: theme identifier → fully specified [`StyleConfig`].
//!
//! The palette choice is presentation-only, so resolution is lenient: an
//! unknown identifier falls back to [`ThemeId::Cyan`] instead of failing.
//! Every known theme maps to a complete palette; there are no partial
//! overrides.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Named visual palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    /// Cyan palette with a soft gradient background. (default)
    #[default]
    Cyan,
    /// Indigo/violet palette with an animated starfield background.
    Moon,
}

impl ThemeId {
    /// Every known theme, in display order.
    pub const ALL: [ThemeId; 2] = [ThemeId::Cyan, ThemeId::Moon];

    /// Parse a theme name, falling back to [`ThemeId::Cyan`] for anything
    /// unrecognised.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "cyan" => ThemeId::Cyan,
            "moon" => ThemeId::Moon,
            other => {
                debug!("Unknown theme '{}', using cyan", other);
                ThemeId::Cyan
            }
        }
    }

    /// Lower-case identifier as accepted by [`ThemeId::from_name`].
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeId::Cyan => "cyan",
            ThemeId::Moon => "moon",
        }
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decorative page background used by the interactive shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundEffect {
    /// Animated radial-dot starfield.
    Starfield,
    /// Static diagonal gradient.
    Gradient,
}

/// Concrete style configuration consumed by the template renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleConfig {
    pub primary_color: &'static str,
    pub primary_dark: &'static str,
    pub primary_light: &'static str,
    pub secondary_color: &'static str,
    pub accent_color: &'static str,
    pub gold_color: &'static str,
    /// Human-readable palette name shown in the page title.
    pub theme_name: &'static str,
    /// Glyph rendered in front of the navbar brand.
    pub brand_glyph: &'static str,
    pub background: BackgroundEffect,
}

const CYAN: StyleConfig = StyleConfig {
    primary_color: "#00bcd4",
    primary_dark: "#0097a7",
    primary_light: "#4dd0e1",
    secondary_color: "#00acc1",
    accent_color: "#00e5ff",
    gold_color: "#ffc107",
    theme_name: "Cyan",
    brand_glyph: "📄",
    background: BackgroundEffect::Gradient,
};

const MOON: StyleConfig = StyleConfig {
    primary_color: "#6366f1",
    primary_dark: "#4f46e5",
    primary_light: "#a5b4fc",
    secondary_color: "#8b5cf6",
    accent_color: "#c084fc",
    gold_color: "#fbbf24",
    theme_name: "Moonlight",
    brand_glyph: "🌙",
    background: BackgroundEffect::Starfield,
};

/// Resolve a theme identifier to its palette.
pub fn resolve(id: ThemeId) -> StyleConfig {
    match id {
        ThemeId::Cyan => CYAN,
        ThemeId::Moon => MOON,
    }
}

/// Resolve a free-form theme name; unknown names yield the cyan palette.
pub fn resolve_name(name: &str) -> StyleConfig {
    resolve(ThemeId::from_name(name))
}
