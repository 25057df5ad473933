#![forbid(unsafe_code)]

//! Per-child size specifications and their string codec.
//!
//! Every child of a split container carries an opaque `container_data`
//! string describing how much of the parent's axis it wants. This module
//! parses that string into a [`SizeSpec`] and writes it back.
//!
//! # Grammar
//!
//! Tokens are separated by `;`. Surrounding whitespace and empty tokens are
//! ignored, tokens may appear in any order, and keys are case-insensitive.
//!
//! ```text
//! 50 | 50% | size:50 | size:50%    relative default (a weight)
//! 120px | size:120px              absolute default (pixels)
//! min:20px | min:10 | min:10%     lower bound
//! max:300px | max:80%             upper bound
//! fixed:100px                     default = min = max
//! fixed | weighted                sizing mode
//! ```
//!
//! Two encodings share the grammar. [`SpecEncoding::Extended`] accepts every
//! token and falls back to a weight of `100`. [`SpecEncoding::ModeTagged`]
//! ignores `min:`/`max:`/`fixed:` and falls back to `10000`.
//!
//! Parsing is total: a token that does not match is skipped, never reported.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Weight assumed when an extended spec names no default.
pub const EXTENDED_FALLBACK_WEIGHT: f64 = 100.0;

/// Weight assumed when a mode-tagged spec names no default.
pub const MODE_TAGGED_FALLBACK_WEIGHT: f64 = 10_000.0;

/// Which flavor of the size-string grammar a tree uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecEncoding {
    /// Sizes with optional `min:`/`max:` bounds.
    #[default]
    Extended,
    /// Sizes tagged `fixed`/`weighted`, without bounds.
    ModeTagged,
}

impl SpecEncoding {
    /// Default weight used when a spec carries no default token.
    #[must_use]
    pub const fn fallback_weight(self) -> f64 {
        match self {
            Self::Extended => EXTENDED_FALLBACK_WEIGHT,
            Self::ModeTagged => MODE_TAGGED_FALLBACK_WEIGHT,
        }
    }

    /// Weight given to a child the normalizer turns into the slack absorber.
    #[must_use]
    pub const fn normalized_weight(self) -> f64 {
        match self {
            Self::Extended => 5_000.0,
            Self::ModeTagged => 10_000.0,
        }
    }

    /// Whether `min:`, `max:` and `fixed:` tokens are understood.
    #[must_use]
    pub const fn supports_bounds(self) -> bool {
        matches!(self, Self::Extended)
    }
}

/// How a child takes part in distributing its container's axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeMode {
    /// Shares the remaining space in proportion to its weight.
    #[default]
    Weighted,
    /// Takes its default as a literal pixel extent.
    Fixed,
}

/// One side of a size range, in pixels or weight units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub value: f64,
    pub absolute: bool,
}

impl Bound {
    /// A bound in pixels.
    #[must_use]
    pub const fn pixels(value: f64) -> Self {
        Self {
            value,
            absolute: true,
        }
    }

    /// A bound in weight units.
    #[must_use]
    pub const fn weight(value: f64) -> Self {
        Self {
            value,
            absolute: false,
        }
    }

    /// Parse `<number>`, `<number>%` or `<number>px`.
    ///
    /// Rejects negative and non-finite numbers.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let lower = text.to_ascii_lowercase();
        let (number, absolute) = if let Some(number) = lower.strip_suffix("px") {
            (number, true)
        } else if let Some(number) = lower.strip_suffix('%') {
            (number, false)
        } else {
            (lower.as_str(), false)
        };
        let value: f64 = number.trim().parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        Some(Self { value, absolute })
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute {
            write!(f, "{}px", self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// Parsed size specification of one child within its container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeSpec {
    pub mode: SizeMode,
    pub default_value: f64,
    pub default_is_absolute: bool,
    pub min: Option<Bound>,
    pub max: Option<Bound>,
}

impl Default for SizeSpec {
    fn default() -> Self {
        Self::weighted(EXTENDED_FALLBACK_WEIGHT)
    }
}

impl SizeSpec {
    /// A weighted child with the given relative weight.
    #[must_use]
    pub const fn weighted(weight: f64) -> Self {
        Self {
            mode: SizeMode::Weighted,
            default_value: weight,
            default_is_absolute: false,
            min: None,
            max: None,
        }
    }

    /// A weighted child whose default is stored in pixels.
    #[must_use]
    pub const fn pixels(pixels: f64) -> Self {
        Self {
            mode: SizeMode::Weighted,
            default_value: pixels,
            default_is_absolute: true,
            min: None,
            max: None,
        }
    }

    /// A fixed-mode child of the given pixel extent.
    #[must_use]
    pub const fn fixed(pixels: f64) -> Self {
        Self {
            mode: SizeMode::Fixed,
            default_value: pixels,
            default_is_absolute: true,
            min: None,
            max: None,
        }
    }

    #[must_use]
    pub const fn with_min(mut self, min: Bound) -> Self {
        self.min = Some(min);
        self
    }

    #[must_use]
    pub const fn with_max(mut self, max: Bound) -> Self {
        self.max = Some(max);
        self
    }

    /// Whether this child is sized in pixels rather than by weight.
    ///
    /// A fixed-mode child reads its number as pixels even if it was written
    /// without the `px` suffix.
    #[must_use]
    pub const fn is_absolute(&self) -> bool {
        matches!(self.mode, SizeMode::Fixed) || self.default_is_absolute
    }

    /// Whether this child's default counts toward the container's total weight.
    #[must_use]
    pub const fn is_relative_weighted(&self) -> bool {
        !self.is_absolute()
    }

    /// Parse a spec string. Never fails.
    #[must_use]
    pub fn parse(encoding: SpecEncoding, text: &str) -> Self {
        let mut spec = Self::weighted(encoding.fallback_weight());
        for token in text.split(';').map(str::trim).filter(|t| !t.is_empty()) {
            spec.apply_token(encoding, token);
        }
        spec
    }

    fn apply_token(&mut self, encoding: SpecEncoding, token: &str) {
        if token.eq_ignore_ascii_case("fixed") {
            self.mode = SizeMode::Fixed;
            return;
        }
        if token.eq_ignore_ascii_case("weighted") {
            self.mode = SizeMode::Weighted;
            return;
        }

        let Some((key, value)) = token.split_once(':') else {
            if let Some(bound) = Bound::parse(token) {
                self.set_default(bound);
            }
            return;
        };
        let Some(bound) = Bound::parse(value) else {
            return;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "size" => self.set_default(bound),
            "min" if encoding.supports_bounds() => self.min = Some(bound),
            "max" if encoding.supports_bounds() => self.max = Some(bound),
            "fixed" if encoding.supports_bounds() => {
                self.set_default(bound);
                self.min = Some(bound);
                self.max = Some(bound);
            }
            _ => {}
        }
    }

    fn set_default(&mut self, bound: Bound) {
        self.default_value = bound.value;
        self.default_is_absolute = bound.absolute;
    }

    /// Serialize to the given encoding.
    ///
    /// Bounds are dropped for [`SpecEncoding::ModeTagged`], which cannot
    /// express them.
    #[must_use]
    pub fn serialize(&self, encoding: SpecEncoding) -> String {
        let mut tokens = Vec::with_capacity(4);
        match (encoding, self.mode) {
            (_, SizeMode::Fixed) => tokens.push("fixed".to_string()),
            (SpecEncoding::ModeTagged, SizeMode::Weighted) => tokens.push("weighted".to_string()),
            (SpecEncoding::Extended, SizeMode::Weighted) => {}
        }
        tokens.push(self.default_bound().to_string());
        if encoding.supports_bounds() {
            if let Some(min) = self.min {
                tokens.push(format!("min:{min}"));
            }
            if let Some(max) = self.max {
                tokens.push(format!("max:{max}"));
            }
        }
        tokens.join(";")
    }

    /// The default as a [`Bound`] (value plus unit).
    #[must_use]
    pub const fn default_bound(&self) -> Bound {
        Bound {
            value: self.default_value,
            absolute: self.default_is_absolute,
        }
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize(SpecEncoding::Extended))
    }
}
