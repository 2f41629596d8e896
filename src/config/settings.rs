//! User settings for tickcell
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// All user-configurable options.
///
/// Every field carries a serde default so partial config files load cleanly;
/// unknown fields are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How far (in characters) a clicked checkbox's recorded in-cell offset
    /// may drift from a candidate occurrence before the exact-position match
    /// is abandoned in favor of the first-occurrence fallback. Absorbs small
    /// edits made elsewhere in the cell between render and click.
    pub in_cell_tolerance: usize,
}

impl Settings {
    /// Smallest accepted drift tolerance (exact-offset matching only).
    pub const MIN_TOLERANCE: usize = 0;

    /// Largest accepted drift tolerance. Anything wider would routinely
    /// match the wrong occurrence in dense cells.
    pub const MAX_TOLERANCE: usize = 16;

    /// Parse settings from JSON and clamp out-of-range values.
    pub fn from_json_sanitized(json: &str) -> serde_json::Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Clamp all fields into their valid ranges.
    pub fn sanitize(&mut self) {
        self.in_cell_tolerance = self
            .in_cell_tolerance
            .clamp(Self::MIN_TOLERANCE, Self::MAX_TOLERANCE);
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            in_cell_tolerance: 2,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tolerance() {
        assert_eq!(Settings::default().in_cell_tolerance, 2);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json_sanitized("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let settings =
            Settings::from_json_sanitized(r#"{"in_cell_tolerance": 3, "future": true}"#).unwrap();
        assert_eq!(settings.in_cell_tolerance, 3);
    }

    #[test]
    fn test_sanitize_clamps_tolerance() {
        let settings = Settings::from_json_sanitized(r#"{"in_cell_tolerance": 999}"#).unwrap();
        assert_eq!(settings.in_cell_tolerance, Settings::MAX_TOLERANCE);
    }

    #[test]
    fn test_round_trip() {
        let original = Settings {
            in_cell_tolerance: 5,
        };
        let json = serde_json::to_string(&original).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, original);
    }
}
