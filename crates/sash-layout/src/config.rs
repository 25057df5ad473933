#![forbid(unsafe_code)]

//! Tunables for [`SashLayout`](crate::SashLayout) and the drag controller.
//!
//! # Loading
//!
//! ```toml
//! # sash.toml
//! sash_width = 6
//! hit_tolerance = 4
//! encoding = "mode_tagged"
//!
//! [margin]
//! top = 2
//! left = 2
//! ```
//!
//! ```rust,ignore
//! let config = SashLayoutConfig::from_toml_file("sash.toml")?;
//! let config = SashLayoutConfig::from_json_str(json)?;
//! ```
//!
//! Every field has a default, so partial files are fine.

use std::fmt;
use std::path::Path;

use sash_core::geometry::Sides;
use serde::{Deserialize, Serialize};

use crate::size_spec::SpecEncoding;
use crate::tree::Orientation;

/// Default sash thickness in pixels.
pub const DEFAULT_SASH_WIDTH: i32 = 4;

/// Default hit-test slop around a sash, in pixels on each side.
pub const DEFAULT_HIT_TOLERANCE: i32 = 5;

/// Default smallest extent a drag may leave a pane at.
pub const DEFAULT_MIN_PANE: i32 = 20;

/// Largest accepted `sash_width` and `hit_tolerance`.
pub const MAX_SASH_PIXELS: i32 = 1_024;

/// Largest accepted minimum pane extent.
pub const MAX_MIN_PANE: i32 = 65_536;

/// Layout and drag configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SashLayoutConfig {
    /// Thickness of every sash along its container's axis.
    pub sash_width: i32,
    /// Extra pixels around a sash that still count as a hit.
    pub hit_tolerance: i32,
    /// Smallest width a drag may leave a pane at in a horizontal container.
    pub min_pane_horizontal: i32,
    /// Smallest height a drag may leave a pane at in a vertical container.
    pub min_pane_vertical: i32,
    /// Space kept free around the root's client area.
    pub margin: Sides,
    /// Which spec grammar the tree's `container_data` uses.
    pub encoding: SpecEncoding,
}

impl Default for SashLayoutConfig {
    fn default() -> Self {
        Self {
            sash_width: DEFAULT_SASH_WIDTH,
            hit_tolerance: DEFAULT_HIT_TOLERANCE,
            min_pane_horizontal: DEFAULT_MIN_PANE,
            min_pane_vertical: DEFAULT_MIN_PANE,
            margin: Sides::default(),
            encoding: SpecEncoding::default(),
        }
    }
}

impl SashLayoutConfig {
    #[must_use]
    pub fn with_sash_width(mut self, sash_width: i32) -> Self {
        self.sash_width = sash_width;
        self
    }

    #[must_use]
    pub fn with_hit_tolerance(mut self, hit_tolerance: i32) -> Self {
        self.hit_tolerance = hit_tolerance;
        self
    }

    #[must_use]
    pub fn with_min_pane(mut self, horizontal: i32, vertical: i32) -> Self {
        self.min_pane_horizontal = horizontal;
        self.min_pane_vertical = vertical;
        self
    }

    #[must_use]
    pub fn with_margin(mut self, margin: Sides) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: SpecEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Minimum pane extent for sashes of a container with this orientation.
    #[must_use]
    pub const fn min_pane(&self, orientation: Orientation) -> i32 {
        match orientation {
            Orientation::Horizontal => self.min_pane_horizontal,
            Orientation::Vertical => self.min_pane_vertical,
        }
    }

    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(0..=MAX_SASH_PIXELS).contains(&self.sash_width) {
            errors.push(format!(
                "sash_width must be in [0, {MAX_SASH_PIXELS}], got {}",
                self.sash_width
            ));
        }
        if !(0..=MAX_SASH_PIXELS).contains(&self.hit_tolerance) {
            errors.push(format!(
                "hit_tolerance must be in [0, {MAX_SASH_PIXELS}], got {}",
                self.hit_tolerance
            ));
        }
        if !(0..=MAX_MIN_PANE).contains(&self.min_pane_horizontal) {
            errors.push(format!(
                "min_pane_horizontal must be in [0, {MAX_MIN_PANE}], got {}",
                self.min_pane_horizontal
            ));
        }
        if !(0..=MAX_MIN_PANE).contains(&self.min_pane_vertical) {
            errors.push(format!(
                "min_pane_vertical must be in [0, {MAX_MIN_PANE}], got {}",
                self.min_pane_vertical
            ));
        }
        let Sides {
            top,
            right,
            bottom,
            left,
        } = self.margin;
        if top < 0 || right < 0 || bottom < 0 || left < 0 {
            errors.push(format!(
                "margin must be non-negative, got top={top} right={right} bottom={bottom} left={left}"
            ));
        }
        errors
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors that can occur when loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
