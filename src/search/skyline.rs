//! Pareto skyline maintenance over (area_ratio, timing_ratio) points.

use serde::Serialize;

/// A non-dominated trade-off point. Smaller is better on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeoffPoint {
    /// Area of the selection divided by the full-catalog area.
    pub area_ratio: f64,
    /// Timing of the selection divided by the empty-selection timing.
    pub timing_ratio: f64,
}

/// Maintains the set of non-dominated trade-off points seen so far.
///
/// Points are stored with negated coordinates so dominance reads as "larger
/// on both axes" internally; the public contract is over the original
/// ratios with lower-is-better on both. After every insertion the stored
/// set is an antichain: no member weakly dominates another.
#[derive(Debug, Clone, Default)]
pub struct ParetoTracker {
    // negated: (-area_ratio, -timing_ratio)
    points: Vec<(f64, f64)>,
}

impl ParetoTracker {
    /// Empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a point, keeping only the non-dominated frontier.
    ///
    /// A point weakly dominated by a current member (ties included) is
    /// rejected; current members weakly dominated by the new point are
    /// dropped. An exact duplicate is rejected, not re-added.
    pub fn add_point(&mut self, area_ratio: f64, timing_ratio: f64) {
        let (x, y) = (-area_ratio, -timing_ratio);
        let mut kept = Vec::with_capacity(self.points.len() + 1);
        for &(x1, y1) in &self.points {
            if x <= x1 && y <= y1 {
                // an existing point already covers the candidate
                return;
            }
            if x < x1 || y < y1 {
                kept.push((x1, y1));
            }
        }
        kept.push((x, y));
        self.points = kept;
    }

    /// Number of frontier points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if no point has been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The frontier sorted by descending (area_ratio, timing_ratio).
    pub fn frontier(&self) -> Vec<TradeoffPoint> {
        let mut frontier: Vec<TradeoffPoint> = self
            .points
            .iter()
            .map(|&(x, y)| TradeoffPoint {
                area_ratio: -x,
                timing_ratio: -y,
            })
            .collect();
        frontier.sort_by(|a, b| {
            (b.area_ratio, b.timing_ratio)
                .partial_cmp(&(a.area_ratio, a.timing_ratio))
                .unwrap()
        });
        frontier
    }
}
