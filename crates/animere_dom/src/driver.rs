//! Delivery of queued notifications to an engine
//!
//! A browser calls observer callbacks from its event loop. Here the caller
//! decides when that happens: [`flush`] plays the role of one event loop
//! turn, handing pending mutation records first and intersection reports
//! second, so elements inserted since the last turn get their initial
//! report in the same turn.

use std::time::Instant;

use animere_core::Animere;

use crate::document::Document;

/// What one [`flush`] delivered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushStats {
    /// Mutation records handed to the engine
    pub mutations: usize,
    /// Intersection entries handed to the engine
    pub entries: usize,
    /// Triggers attached from inserted nodes
    pub attached: usize,
    /// Triggers that qualified and started animating
    pub qualified: usize,
}

/// Deliver pending mutation records, then pending intersection reports
pub fn flush(doc: &mut Document, engine: &mut Animere<Document>) -> FlushStats {
    flush_at(doc, engine, Instant::now())
}

/// [`flush`] on a caller-supplied clock
///
/// Animations started by this turn are timed from `now`.
pub fn flush_at(doc: &mut Document, engine: &mut Animere<Document>, now: Instant) -> FlushStats {
    let records = doc.take_mutation_records();
    let attached = engine.handle_mutations(doc, &records);

    let entries = doc.take_intersection_entries();
    let qualified = engine.handle_intersections_at(doc, &entries, now);

    let stats = FlushStats {
        mutations: records.len(),
        entries: entries.len(),
        attached,
        qualified,
    };
    tracing::trace!(?stats, "flushed");
    stats
}

/// Fire `animationend` on every node with a pending listener
///
/// Returns how many listeners ran.
pub fn end_animations(doc: &mut Document) -> usize {
    doc.animating_nodes()
        .into_iter()
        .map(|node| doc.dispatch_animation_end(node))
        .sum()
}
