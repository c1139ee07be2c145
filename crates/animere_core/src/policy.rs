//! Qualification policies
//!
//! An intersection report only starts an animation when it *qualifies*.
//! Without an axis the rule is the platform's: the reported ratio of visible
//! area must reach the threshold. With an axis configured, overlap is judged
//! along that axis alone, from the element and root rectangles.

use crate::config::{Axis, Config};
use crate::geometry::Rect;
use crate::host::{IntersectionEntry, Reporting};

/// Rule deciding whether an intersection report qualifies
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Qualifier {
    /// Visible area ratio must reach `threshold`
    Ratio { threshold: f64 },
    /// One-dimensional overlap along `axis`
    Axis { axis: Axis },
}

impl Qualifier {
    pub fn from_config(config: &Config) -> Self {
        match config.axis() {
            Some(axis) => Qualifier::Axis { axis },
            None => Qualifier::Ratio {
                threshold: config.visibility_threshold(),
            },
        }
    }

    /// Reporting an observer needs for this rule to see every qualifying
    /// position
    ///
    /// The area ratio can stay put while the axis test changes with scroll
    /// position, so the axis rule asks for a report on every move.
    pub fn reporting(&self) -> Reporting {
        match *self {
            Qualifier::Ratio { threshold } => Reporting::Threshold(threshold),
            Qualifier::Axis { .. } => Reporting::Continuous,
        }
    }

    /// Whether `entry` qualifies
    ///
    /// A ratio of exactly zero never qualifies, whatever the policy.
    pub fn qualifies<N, O>(&self, entry: &IntersectionEntry<N, O>) -> bool {
        let ratio = entry.intersection_ratio;
        if ratio <= 0.0 || ratio.is_nan() {
            return false;
        }

        match *self {
            Qualifier::Ratio { threshold } => entry.is_intersecting && ratio >= threshold,
            Qualifier::Axis { axis } => {
                axis_overlap(axis, &entry.bounding_rect, &entry.root_bounds, ratio)
            }
        }
    }
}

/// Axis-restricted overlap test
///
/// `half = (element extent + root extent) * ratio / 2`; the element
/// qualifies when its far edge pulled back by `half` still reaches past the
/// root's near edge and its near edge pushed forward by `half` stays before
/// the root's far edge.
pub fn axis_overlap(axis: Axis, element: &Rect, root: &Rect, ratio: f64) -> bool {
    if ratio == 0.0 {
        return false;
    }

    let half = (element.extent(axis) + root.extent(axis)) * ratio / 2.0;
    element.far(axis) - half >= root.near(axis) && element.near(axis) + half <= root.far(axis)
}
