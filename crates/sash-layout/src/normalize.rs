#![forbid(unsafe_code)]

//! Per-container spec normalization, run before every sizing pass.
//!
//! Guarantees, for the visible children of one container:
//! 1. at least one child carries a relative weight;
//! 2. at least one weighted child has no max, so it can absorb slack;
//! 3. (mode-tagged trees) no weighted child keeps a pixel default left over
//!    from an earlier fixed state.
//!
//! The caller writes every changed spec back to its node.

use crate::convert::{available_relative_pixels, pixel_size, pixels_to_weight, total_weight};
use crate::size_spec::{SizeMode, SizeSpec, SpecEncoding};

/// What the normalizer changed, by child index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Child forced to a relative weight because none had one.
    pub forced_weighted: Option<usize>,
    /// Child whose max was removed to keep one unbounded weighted child.
    pub stripped_max: Option<usize>,
    /// Weighted children converted from pixel to relative defaults.
    pub reconciled: Vec<usize>,
}

impl NormalizeReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forced_weighted.is_none() && self.stripped_max.is_none() && self.reconciled.is_empty()
    }

    /// Indices of every child whose spec changed, ascending and unique.
    #[must_use]
    pub fn changed(&self) -> Vec<usize> {
        let mut changed: Vec<usize> = self
            .reconciled
            .iter()
            .copied()
            .chain(self.forced_weighted)
            .chain(self.stripped_max)
            .collect();
        changed.sort_unstable();
        changed.dedup();
        changed
    }
}

/// Normalize the specs of one container's visible children in place.
pub fn normalize(
    specs: &mut [SizeSpec],
    encoding: SpecEncoding,
    axis_extent: f64,
    sash_width: f64,
) -> NormalizeReport {
    let mut report = NormalizeReport::default();
    if specs.is_empty() {
        return report;
    }

    if encoding == SpecEncoding::ModeTagged {
        report.reconciled = reconcile_legacy_pixels(specs, encoding, axis_extent, sash_width);
    }

    if !specs.iter().any(SizeSpec::is_relative_weighted) {
        let last = specs.len() - 1;
        let spec = &mut specs[last];
        spec.mode = SizeMode::Weighted;
        spec.default_value = encoding.normalized_weight();
        spec.default_is_absolute = false;
        report.forced_weighted = Some(last);
    }

    let weighted: Vec<usize> = specs
        .iter()
        .enumerate()
        .filter(|(_, spec)| spec.is_relative_weighted())
        .map(|(index, _)| index)
        .collect();
    if weighted.iter().all(|&index| specs[index].max.is_some())
        && let Some(&last) = weighted.last()
    {
        specs[last].max = None;
        report.stripped_max = Some(last);
    }

    report
}

/// Convert weighted children with a pixel default into equivalent weights.
fn reconcile_legacy_pixels(
    specs: &mut [SizeSpec],
    encoding: SpecEncoding,
    axis_extent: f64,
    sash_width: f64,
) -> Vec<usize> {
    let stale: Vec<usize> = specs
        .iter()
        .enumerate()
        .filter(|(_, spec)| spec.mode == SizeMode::Weighted && spec.default_is_absolute)
        .map(|(index, _)| index)
        .collect();
    if stale.is_empty() {
        return stale;
    }

    let total = total_weight(specs);
    let available = available_relative_pixels(axis_extent, sash_width, specs);
    let pixels: Vec<f64> = stale
        .iter()
        .map(|&index| pixel_size(&specs[index], total, available))
        .collect();

    // With no weighted sibling or no relative space left, the stale children
    // share the weight scale in proportion to their committed pixels.
    let proportional = total <= 0.0 || available <= 0.0;
    let stale_pixels: f64 = pixels
        .iter()
        .filter(|px| px.is_finite() && **px > 0.0)
        .sum();
    let scale = if total > 0.0 {
        total
    } else {
        encoding.normalized_weight()
    };

    for (&index, &px) in stale.iter().zip(&pixels) {
        let weight = if proportional {
            if stale_pixels > 0.0 && px.is_finite() {
                px / stale_pixels * scale
            } else {
                0.0
            }
        } else {
            pixels_to_weight(px, total, available)
        };
        let spec = &mut specs[index];
        spec.default_value = if weight > 0.0 {
            weight
        } else {
            encoding.normalized_weight()
        };
        spec.default_is_absolute = false;
    }
    stale
}
