#![forbid(unsafe_code)]

//! Container solve recording for diagnosing layouts.
//!
//! Provides introspection into each container solve of a layout pass:
//! - the parsed (post-normalization) specs and the totals used,
//! - the committed pixel sizes and rectangles,
//! - detection of overflow (children + sashes exceed the axis) and
//!   underflow (space left over beyond rounding slack).
//!
//! Recording is a no-op unless explicitly enabled at runtime.
//!
//! ```ignore
//! let debugger = LayoutDebugger::new();
//! debugger.set_enabled(true);
//! let mut layout = SashLayout::new(config).with_debugger(debugger.clone());
//! // ... layout passes ...
//! for record in debugger.overflows() {
//!     eprintln!("{}", record.summary());
//! }
//! ```

use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use sash_core::geometry::Rect;

use crate::size_spec::SizeSpec;
use crate::tree::{NodeId, Orientation};

/// A record of one container solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveRecord {
    pub container: NodeId,
    pub orientation: Orientation,
    /// Container bounds handed to the solve.
    pub bounds: Rect,
    pub sash_width: i32,
    pub total_weight: f64,
    pub available_relative: f64,
    /// Visible children, in order.
    pub children: Vec<NodeId>,
    pub specs: Vec<SizeSpec>,
    /// Committed (rounded) extents along the axis.
    pub sizes: Vec<i32>,
    pub rects: Vec<Rect>,
}

impl SolveRecord {
    /// Extent of the container along its split axis.
    #[must_use]
    pub const fn axis_extent(&self) -> i32 {
        match self.orientation {
            Orientation::Horizontal => self.bounds.width,
            Orientation::Vertical => self.bounds.height,
        }
    }

    /// Pixels used by children and sashes together.
    #[must_use]
    pub fn used(&self) -> i32 {
        let sashes = (self.sizes.len().saturating_sub(1) as i32).saturating_mul(self.sash_width);
        self.sizes
            .iter()
            .fold(sashes, |used, &size| used.saturating_add(size))
    }

    /// Children and sashes need more than the axis offers, beyond rounding.
    #[must_use]
    pub fn has_overflow(&self) -> bool {
        self.used().saturating_sub(self.axis_extent()) > self.rounding_slack()
    }

    /// Space is left over beyond rounding.
    #[must_use]
    pub fn has_underflow(&self) -> bool {
        self.axis_extent().saturating_sub(self.used()) > self.rounding_slack()
    }

    fn rounding_slack(&self) -> i32 {
        self.sizes.len() as i32
    }

    /// Generate a human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "{} ({:?}):", self.container, self.orientation);
        let _ = writeln!(
            s,
            "  Bounds: {}x{} at ({},{})",
            self.bounds.width, self.bounds.height, self.bounds.x, self.bounds.y
        );
        let _ = writeln!(
            s,
            "  Weight: {} over {}px, sash {}",
            self.total_weight, self.available_relative, self.sash_width
        );
        for (i, ((child, spec), size)) in self
            .children
            .iter()
            .zip(&self.specs)
            .zip(&self.sizes)
            .enumerate()
        {
            let rect_str = self.rects.get(i).map_or_else(
                || "?".to_string(),
                |r| format!("({},{} {}x{})", r.x, r.y, r.width, r.height),
            );
            let _ = writeln!(s, "  [{i}] {child} {spec} -> {size} @ {rect_str}");
        }
        let _ = writeln!(s, "  Used: {}/{}", self.used(), self.axis_extent());
        if self.has_overflow() {
            let _ = writeln!(s, "  OVERFLOW");
        }
        if self.has_underflow() {
            let _ = writeln!(s, "  UNDERFLOW");
        }
        s
    }
}

/// Solve-record collector.
///
/// Shared between the engine and whoever inspects it; disabled by default.
#[derive(Debug)]
pub struct LayoutDebugger {
    enabled: AtomicBool,
    records: Mutex<Vec<SolveRecord>>,
}

impl LayoutDebugger {
    /// Create a new debugger wrapped in Arc (disabled by default).
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            enabled: AtomicBool::new(false),
            records: Mutex::new(Vec::new()),
        })
    }

    #[inline]
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }

    /// Record a container solve. Ignored while disabled.
    pub fn record(&self, record: SolveRecord) {
        if !self.enabled() {
            return;
        }
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<SolveRecord> {
        self.records
            .lock()
            .ok()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn overflows(&self) -> Vec<SolveRecord> {
        self.snapshot()
            .into_iter()
            .filter(SolveRecord::has_overflow)
            .collect()
    }

    #[must_use]
    pub fn underflows(&self) -> Vec<SolveRecord> {
        self.snapshot()
            .into_iter()
            .filter(SolveRecord::has_underflow)
            .collect()
    }

    /// Summaries of every record, in solve order.
    #[must_use]
    pub fn dump(&self) -> String {
        self.snapshot()
            .iter()
            .map(SolveRecord::summary)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> NodeId {
        NodeId::new(raw).expect("test ID must be non-zero")
    }

    fn record(width: i32, sizes: Vec<i32>) -> SolveRecord {
        let children: Vec<NodeId> = (0..sizes.len() as u64).map(|i| id(i + 2)).collect();
        SolveRecord {
            container: id(1),
            orientation: Orientation::Horizontal,
            bounds: Rect::new(0, 0, width, 50),
            sash_width: 4,
            total_weight: 100.0,
            available_relative: f64::from(width),
            specs: vec![SizeSpec::weighted(50.0); sizes.len()],
            children,
            sizes,
            rects: Vec::new(),
        }
    }

    #[test]
    fn disabled_debugger_records_nothing() {
        let debugger = LayoutDebugger::new();
        debugger.record(record(400, vec![198, 198]));
        assert!(debugger.snapshot().is_empty());
    }

    #[test]
    fn exact_fit_is_neither_over_nor_under() {
        let r = record(400, vec![198, 198]);
        assert_eq!(r.used(), 400);
        assert!(!r.has_overflow());
        assert!(!r.has_underflow());
    }

    #[test]
    fn huge_sizes_saturate_instead_of_wrapping() {
        let r = record(400, vec![i32::MAX, 50]);
        assert_eq!(r.used(), i32::MAX);
        assert!(r.has_overflow());
        assert!(!r.has_underflow());
    }

    #[test]
    fn detects_overflow_and_underflow() {
        let debugger = LayoutDebugger::new();
        debugger.set_enabled(true);
        debugger.record(record(400, vec![250, 250]));
        debugger.record(record(400, vec![100, 100]));
        debugger.record(record(400, vec![199, 198]));
        assert_eq!(debugger.snapshot().len(), 3);
        assert_eq!(debugger.overflows().len(), 1);
        assert_eq!(debugger.underflows().len(), 1);
        assert!(debugger.dump().contains("OVERFLOW"));

        debugger.clear();
        assert!(debugger.snapshot().is_empty());
    }

    #[test]
    fn summary_lists_children() {
        let summary = record(400, vec![198, 198]).summary();
        assert!(summary.starts_with("#1 (Horizontal):"));
        assert!(summary.contains("[1] #3 50 -> 198"));
        assert!(summary.contains("Used: 400/400"));
    }
}
