//! Animation events

use animere_core::AnimationEndListener;
use smallvec::SmallVec;

use crate::document::{Document, NodeId};

pub(crate) type Listeners = SmallVec<[AnimationEndListener<Document>; 1]>;

impl Document {
    pub(crate) fn add_animation_end_listener(
        &mut self,
        node: NodeId,
        listener: AnimationEndListener<Document>,
    ) {
        self.listeners.entry(node).or_default().push(listener);
    }

    /// Fire `animationend` on `node`
    ///
    /// Every registered listener runs once and is removed before it runs,
    /// so listeners registered while dispatching wait for the next event.
    /// Returns how many listeners ran.
    pub fn dispatch_animation_end(&mut self, node: NodeId) -> usize {
        let Some(listeners) = self.listeners.remove(&node) else {
            tracing::trace!(?node, "animationend without listeners");
            return 0;
        };

        let count = listeners.len();
        for listener in listeners {
            listener(self, node);
        }
        count
    }

    /// Number of pending `animationend` listeners on `node`
    pub fn animation_listener_count(&self, node: NodeId) -> usize {
        self.listeners.get(&node).map_or(0, |l| l.len())
    }

    /// Nodes with at least one pending `animationend` listener
    pub fn animating_nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .listeners
            .iter()
            .filter(|(_, l)| !l.is_empty())
            .map(|(&node, _)| node)
            .collect();
        nodes.sort();
        nodes
    }
}
