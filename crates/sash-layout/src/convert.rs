#![forbid(unsafe_code)]

//! Weight/pixel conversion for the visible children of one container.
//!
//! All functions here are pure. They take the already-parsed specs of a
//! container's *visible* children (in order) and never touch the tree.
//!
//! Terms:
//! - **total weight** `T`: sum of the relative defaults of weighted children.
//! - **available relative pixels** `A`: the axis extent left for weighted
//!   children once absolute children and sashes are paid for.
//!
//! A relative child with weight `w` is worth `w / T * A` pixels.

use crate::size_spec::{Bound, SizeSpec};

/// Total weight substituted when a container has no positive weight.
pub const NOMINAL_TOTAL_WEIGHT: f64 = 10_000.0;

/// Sum of the relative defaults of weighted children.
///
/// Absolute-sized children (fixed mode, or a pixel default) are excluded.
#[must_use]
pub fn total_weight(specs: &[SizeSpec]) -> f64 {
    specs
        .iter()
        .filter(|spec| spec.is_relative_weighted())
        .map(|spec| spec.default_value)
        .sum()
}

/// `total`, or [`NOMINAL_TOTAL_WEIGHT`] when it is zero or not finite.
#[must_use]
pub fn effective_total_weight(total: f64) -> f64 {
    if total > 0.0 && total.is_finite() {
        total
    } else {
        NOMINAL_TOTAL_WEIGHT
    }
}

/// Pixels left for weighted children after absolute children and sashes.
///
/// Absolute children contribute their pixel default clamped by their pixel
/// bounds (weight bounds cannot be resolved before this value is known, so
/// they are skipped here). Never negative.
#[must_use]
pub fn available_relative_pixels(axis_extent: f64, sash_width: f64, specs: &[SizeSpec]) -> f64 {
    let sashes = specs.len().saturating_sub(1) as f64 * sash_width;
    let absolute: f64 = specs
        .iter()
        .filter(|spec| spec.is_absolute())
        .map(absolute_only_size)
        .sum();
    (axis_extent - absolute - sashes).max(0.0)
}

fn absolute_only_size(spec: &SizeSpec) -> f64 {
    let (lo, hi) = ordered_bounds(
        spec.min.filter(|b| b.absolute).map(|b| b.value),
        spec.max.filter(|b| b.absolute).map(|b| b.value),
    );
    clamp_optional(spec.default_value, lo, hi).max(0.0)
}

/// Pixels worth of `weight` under the given totals.
#[must_use]
pub fn weight_to_pixels(weight: f64, total_weight: f64, available_relative: f64) -> f64 {
    weight / effective_total_weight(total_weight) * available_relative
}

/// Weight equivalent to `pixels` under the given totals.
///
/// Returns `0.0` when there is no relative space to express it in.
#[must_use]
pub fn pixels_to_weight(pixels: f64, total_weight: f64, available_relative: f64) -> f64 {
    if available_relative <= 0.0 || !available_relative.is_finite() {
        return 0.0;
    }
    pixels * effective_total_weight(total_weight) / available_relative
}

/// The spec's default expressed in pixels.
///
/// Absolute specs return their value unchanged.
#[must_use]
pub fn to_absolute(spec: &SizeSpec, total_weight: f64, available_relative: f64) -> f64 {
    if spec.is_absolute() {
        spec.default_value
    } else {
        weight_to_pixels(spec.default_value, total_weight, available_relative)
    }
}

/// The spec's default expressed as a weight.
///
/// Relative specs return their value unchanged.
#[must_use]
pub fn to_relative(spec: &SizeSpec, total_weight: f64, available_relative: f64) -> f64 {
    if spec.is_absolute() {
        pixels_to_weight(spec.default_value, total_weight, available_relative)
    } else {
        spec.default_value
    }
}

/// A bound expressed in pixels.
#[must_use]
pub fn bound_to_pixels(bound: Bound, total_weight: f64, available_relative: f64) -> f64 {
    if bound.absolute {
        bound.value
    } else {
        weight_to_pixels(bound.value, total_weight, available_relative)
    }
}

/// Pixel `[min, max]` of a spec; absent bounds are `None`.
///
/// An inverted pair is swapped so that `min <= max`.
#[must_use]
pub fn pixel_bounds(
    spec: &SizeSpec,
    total_weight: f64,
    available_relative: f64,
) -> (Option<f64>, Option<f64>) {
    let convert = |bound: Bound| bound_to_pixels(bound, total_weight, available_relative);
    ordered_bounds(spec.min.map(convert), spec.max.map(convert))
}

/// The default clamped to `[min, max]`, in the default's own unit.
///
/// Bounds written in the other unit are converted first. Absent bounds
/// impose nothing; an inverted pair is swapped before clamping.
#[must_use]
pub fn constrain(spec: &SizeSpec, total_weight: f64, available_relative: f64) -> f64 {
    let absolute = spec.is_absolute();
    let to_default_unit = |bound: Bound| match (bound.absolute, absolute) {
        (true, true) | (false, false) => bound.value,
        (true, false) => pixels_to_weight(bound.value, total_weight, available_relative),
        (false, true) => weight_to_pixels(bound.value, total_weight, available_relative),
    };
    let (lo, hi) = ordered_bounds(spec.min.map(to_default_unit), spec.max.map(to_default_unit));
    clamp_optional(spec.default_value, lo, hi)
}

/// `constrain` followed by `to_absolute`.
#[must_use]
pub fn pixel_size(spec: &SizeSpec, total_weight: f64, available_relative: f64) -> f64 {
    let value = constrain(spec, total_weight, available_relative);
    if spec.is_absolute() {
        value
    } else {
        weight_to_pixels(value, total_weight, available_relative)
    }
}

fn ordered_bounds(lo: Option<f64>, hi: Option<f64>) -> (Option<f64>, Option<f64>) {
    match (lo, hi) {
        (Some(lo), Some(hi)) if lo > hi => (Some(hi), Some(lo)),
        other => other,
    }
}

fn clamp_optional(value: f64, lo: Option<f64>, hi: Option<f64>) -> f64 {
    let mut value = value;
    if let Some(hi) = hi {
        value = value.min(hi);
    }
    if let Some(lo) = lo {
        value = value.max(lo);
    }
    value
}

/// Nominal (unrounded) pixel extents for one container's visible children.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSolution {
    /// Pixel extent per child, in child order.
    pub sizes: Vec<f64>,
    /// Total weight used for the solve.
    pub total_weight: f64,
    /// Available relative pixels used for the solve.
    pub available_relative: f64,
}

/// Distribute `axis_extent` among `specs`.
///
/// Absolute children get [`pixel_size`]. Weighted children split the
/// available relative pixels by weight; a child whose share breaks its own
/// bounds is frozen at the bound and the rest is re-split among the others,
/// so space one child cannot take flows to its unbounded siblings.
#[must_use]
pub fn solve_axis(specs: &[SizeSpec], axis_extent: f64, sash_width: f64) -> AxisSolution {
    let total = total_weight(specs);
    let available = available_relative_pixels(axis_extent, sash_width, specs);
    let mut sizes = vec![0.0; specs.len()];

    let mut active: Vec<usize> = Vec::with_capacity(specs.len());
    for (index, spec) in specs.iter().enumerate() {
        if spec.is_absolute() {
            sizes[index] = pixel_size(spec, total, available).max(0.0);
        } else {
            active.push(index);
        }
    }

    let bounds: Vec<(Option<f64>, Option<f64>)> = specs
        .iter()
        .map(|spec| pixel_bounds(spec, total, available))
        .collect();

    let mut pool = available;
    while !active.is_empty() {
        let weight_sum: f64 = active.iter().map(|&i| specs[i].default_value).sum();
        let share = |i: usize| -> f64 {
            if weight_sum > 0.0 {
                specs[i].default_value / weight_sum * pool
            } else {
                pool / active.len() as f64
            }
        };

        let mut violation = 0.0;
        let mut clamped = Vec::with_capacity(active.len());
        for &i in &active {
            let want = share(i);
            let (lo, hi) = bounds[i];
            let got = clamp_optional(want, lo, hi).max(0.0);
            violation += got - want;
            clamped.push((i, want, got));
        }

        if violation.abs() < 1e-9 {
            for (i, want, _) in clamped {
                sizes[i] = want.max(0.0);
            }
            break;
        }

        // Freeze min violators when over-committed, max violators when under.
        let freeze_min = violation > 0.0;
        let mut still_active = Vec::with_capacity(active.len());
        for (i, want, got) in clamped {
            let frozen = if freeze_min { got > want } else { got < want };
            if frozen {
                sizes[i] = got;
                pool -= got;
            } else {
                still_active.push(i);
            }
        }
        if still_active.len() == active.len() {
            break;
        }
        active = still_active;
    }

    AxisSolution {
        sizes,
        total_weight: total,
        available_relative: available,
    }
}

/// Round half up, as pixel extents are committed.
#[must_use]
pub fn round_pixels(pixels: f64) -> i32 {
    (pixels + 0.5).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::size_spec::{SizeMode, SpecEncoding};
    use proptest::prelude::*;

    fn parse(text: &str) -> SizeSpec {
        SizeSpec::parse(SpecEncoding::Extended, text)
    }

    #[test]
    fn total_weight_skips_absolute_children() {
        let specs = [parse("30"), parse("200px"), parse("fixed;50"), parse("70")];
        assert_eq!(total_weight(&specs), 100.0);
    }

    #[test]
    fn available_subtracts_absolute_and_sashes() {
        let specs = [parse("100px"), parse("50"), parse("50")];
        assert_eq!(available_relative_pixels(400.0, 4.0, &specs), 292.0);
    }

    #[test]
    fn available_never_negative() {
        let specs = [parse("500px"), parse("50")];
        assert_eq!(available_relative_pixels(300.0, 4.0, &specs), 0.0);
    }

    #[test]
    fn absolute_size_respects_pixel_bounds_in_available() {
        let specs = [parse("500px;max:120px"), parse("1")];
        assert_eq!(available_relative_pixels(300.0, 0.0, &specs), 180.0);
    }

    #[test]
    fn zero_total_uses_nominal_weight() {
        assert_eq!(effective_total_weight(0.0), NOMINAL_TOTAL_WEIGHT);
        assert_eq!(effective_total_weight(f64::NAN), NOMINAL_TOTAL_WEIGHT);
        assert_eq!(weight_to_pixels(5_000.0, 0.0, 200.0), 100.0);
    }

    #[test]
    fn to_absolute_and_to_relative_keep_own_unit() {
        let px = SizeSpec::pixels(120.0);
        assert_eq!(to_absolute(&px, 100.0, 400.0), 120.0);
        assert_eq!(to_relative(&px, 100.0, 400.0), 30.0);

        let w = SizeSpec::weighted(25.0);
        assert_eq!(to_absolute(&w, 100.0, 400.0), 100.0);
        assert_eq!(to_relative(&w, 100.0, 400.0), 25.0);
    }

    #[test]
    fn pixels_to_weight_without_space_is_zero() {
        assert_eq!(pixels_to_weight(40.0, 100.0, 0.0), 0.0);
    }

    #[test]
    fn constrain_converts_foreign_units() {
        // weight 50 of 100 over 400px = 200px; max 120px = weight 30.
        let spec = parse("50;max:120px");
        assert_eq!(constrain(&spec, 100.0, 400.0), 30.0);
        assert_eq!(pixel_size(&spec, 100.0, 400.0), 120.0);

        // 300px with max 50% of (100 weight over 400px) = 200px.
        let spec = parse("300px;max:50");
        assert_eq!(constrain(&spec, 100.0, 400.0), 200.0);
    }

    #[test]
    fn constrain_without_bounds_is_identity() {
        let spec = parse("42");
        assert_eq!(constrain(&spec, 100.0, 400.0), 42.0);
    }

    #[test]
    fn inverted_bounds_are_swapped() {
        let spec = parse("10px;min:80px;max:20px");
        assert_eq!(constrain(&spec, 1.0, 1.0), 20.0);
        let spec = parse("500px;min:80px;max:20px");
        assert_eq!(constrain(&spec, 1.0, 1.0), 80.0);
    }

    #[test]
    fn solve_even_split() {
        let specs = [parse("50"), parse("50")];
        let solution = solve_axis(&specs, 400.0, 4.0);
        assert_eq!(solution.sizes, vec![198.0, 198.0]);
    }

    #[test]
    fn solve_fixed_and_single_weight() {
        let specs = [
            SizeSpec {
                mode: SizeMode::Fixed,
                ..SizeSpec::pixels(100.0)
            },
            SizeSpec::weighted(10_000.0),
        ];
        let solution = solve_axis(&specs, 300.0, 0.0);
        assert_eq!(solution.sizes, vec![100.0, 200.0]);
    }

    #[test]
    fn solve_redistributes_max_overflow() {
        let specs = [parse("50;max:100px"), parse("50")];
        let solution = solve_axis(&specs, 400.0, 0.0);
        assert_eq!(solution.sizes, vec![100.0, 300.0]);
    }

    #[test]
    fn solve_redistributes_min_shortfall() {
        let specs = [parse("10;min:150px"), parse("90"), parse("100")];
        let solution = solve_axis(&specs, 400.0, 0.0);
        assert_eq!(solution.sizes[0], 150.0);
        let rest: f64 = solution.sizes[1..].iter().sum();
        assert!((rest - 250.0).abs() < 1e-9);
        assert!((solution.sizes[2] - 250.0 * 100.0 / 190.0).abs() < 1e-9);
    }

    #[test]
    fn solve_zero_weights_share_evenly() {
        let specs = [SizeSpec::weighted(0.0), SizeSpec::weighted(0.0)];
        let solution = solve_axis(&specs, 100.0, 0.0);
        assert_eq!(solution.sizes, vec![50.0, 50.0]);
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_pixels(2.5), 3);
        assert_eq!(round_pixels(2.49), 2);
        assert_eq!(round_pixels(0.0), 0);
    }

    proptest! {
        #[test]
        fn weight_pixel_round_trip(
            weight in 0.0f64..1.0e6,
            total in 0.001f64..1.0e6,
            available in 1.0f64..1.0e5,
        ) {
            let spec = SizeSpec::weighted(weight);
            let back = pixels_to_weight(to_absolute(&spec, total, available), total, available);
            prop_assert!((back - weight).abs() <= 1e-9 * weight.max(1.0));
        }

        #[test]
        fn absolute_round_trip_through_weight(
            pixels in 0.0f64..1.0e5,
            total in 0.001f64..1.0e6,
            available in 1.0f64..1.0e5,
        ) {
            let spec = SizeSpec::pixels(pixels);
            let relative = SizeSpec::weighted(to_relative(&spec, total, available));
            let back = to_absolute(&relative, total, available);
            prop_assert!((back - pixels).abs() <= 1e-9 * pixels.max(1.0));
        }

        #[test]
        fn unbounded_solve_conserves_extent(
            weights in proptest::collection::vec(0.1f64..1000.0, 1..8),
            fixed in proptest::collection::vec(0.0f64..40.0, 0..3),
            extent in 200.0f64..2000.0,
            sash in 0.0f64..8.0,
        ) {
            let mut specs: Vec<SizeSpec> = weights.iter().map(|&w| SizeSpec::weighted(w)).collect();
            specs.extend(fixed.iter().map(|&px| SizeSpec::pixels(px)));
            let solution = solve_axis(&specs, extent, sash);
            let used: f64 = solution.sizes.iter().sum::<f64>()
                + (specs.len() - 1) as f64 * sash;
            prop_assert!((used - extent).abs() < 1e-6);
        }
    }
}
