//! Intersection and mutation observation
//!
//! Observers are evaluated lazily. Scrolling or moving elements only changes
//! geometry; reports are computed when the driver calls
//! [`Document::take_intersection_entries`]. An observer reports once right
//! after it is created. A [`Reporting::Threshold`] observer then reports
//! whenever its target crosses the threshold in either direction, matching
//! browser `IntersectionObserver` behavior for a single threshold. A
//! [`Reporting::Continuous`] observer reports every time the target's
//! viewport-relative geometry changes while it intersects, and once when it
//! stops intersecting.

use animere_core::{IntersectionEntry, MutationRecord, Rect, Reporting};
use slotmap::new_key_type;

use crate::document::{Document, NodeId};

new_key_type! {
    /// Handle to an intersection observation
    pub struct ObserverId;
}

pub(crate) struct Observation {
    pub(crate) target: NodeId,
    pub(crate) reporting: Reporting,
    /// State at the last report; `None` until the first report
    pub(crate) last: Option<Signal>,
}

/// What an observation compares between evaluations
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Signal {
    /// Whether the target was at or above the threshold
    Crossing(bool),
    /// Target and root rectangles while intersecting
    Geometry(Option<(Rect, Rect)>),
}

impl Signal {
    fn of(reporting: Reporting, entry: &DocumentEntry) -> Self {
        match reporting {
            Reporting::Threshold(threshold) => Signal::Crossing(
                entry.is_intersecting && entry.intersection_ratio >= threshold,
            ),
            Reporting::Continuous => Signal::Geometry(
                entry
                    .is_intersecting
                    .then_some((entry.bounding_rect, entry.root_bounds)),
            ),
        }
    }
}

/// Entry type produced by [`Document`]
pub type DocumentEntry = IntersectionEntry<NodeId, ObserverId>;

impl Document {
    pub(crate) fn observe(&mut self, target: NodeId, reporting: Reporting) -> ObserverId {
        self.observations.insert(Observation {
            target,
            reporting,
            last: None,
        })
    }

    pub(crate) fn unobserve(&mut self, observer: ObserverId) {
        self.observations.remove(observer);
    }

    /// Whether any live observer targets `node`
    pub fn is_observed(&self, node: NodeId) -> bool {
        self.observations.values().any(|o| o.target == node)
    }

    pub fn observer_count(&self) -> usize {
        self.observations.len()
    }

    /// Start queueing child-list mutations below the body
    pub fn start_mutation_recording(&mut self) {
        self.observing_mutations = true;
    }

    pub fn is_recording_mutations(&self) -> bool {
        self.observing_mutations
    }

    /// Entry describing `node` against the current viewport
    pub fn entry_for(&self, node: NodeId, observer: ObserverId) -> DocumentEntry {
        let rect = self.rect(node);
        let viewport = self.viewport;

        IntersectionEntry {
            target: node,
            observer,
            is_intersecting: rect.intersection(&viewport).is_some(),
            intersection_ratio: rect.visible_ratio(&viewport),
            bounding_rect: rect.translate(-viewport.x, -viewport.y),
            root_bounds: Rect::new(0.0, 0.0, viewport.width, viewport.height),
        }
    }

    /// Reports due since the last call, in observer creation order
    ///
    /// Targets that left the document are skipped until they return.
    pub fn take_intersection_entries(&mut self) -> Vec<DocumentEntry> {
        let due: Vec<(ObserverId, DocumentEntry, Signal)> = self
            .observations
            .iter()
            .filter(|(_, o)| self.is_connected(o.target))
            .filter_map(|(id, o)| {
                let entry = self.entry_for(o.target, id);
                let signal = Signal::of(o.reporting, &entry);
                (o.last != Some(signal)).then_some((id, entry, signal))
            })
            .collect();

        let mut entries = Vec::with_capacity(due.len());
        for (id, entry, signal) in due {
            if let Some(observation) = self.observations.get_mut(id) {
                observation.last = Some(signal);
            }
            entries.push(entry);
        }

        if !entries.is_empty() {
            tracing::trace!(count = entries.len(), "intersection entries due");
        }
        entries
    }

    /// Drain queued mutation records
    pub fn take_mutation_records(&mut self) -> Vec<MutationRecord<NodeId>> {
        std::mem::take(&mut self.mutation_queue)
    }
}
