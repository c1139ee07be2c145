//! Dynamic attachment watcher
//!
//! With dynamic watching enabled the engine asks the host for child-list
//! mutation records of the body subtree and attaches a fresh trigger to
//! every inserted element that carries the prefix attribute.

use crate::config::Config;
use crate::host::{Host, HostMutation};

/// Whether `node` should get a trigger
///
/// Candidates are elements carrying the name attribute, without the skip
/// attribute, that have not finished already.
pub fn is_candidate<H: Host>(host: &H, node: H::Node, config: &Config) -> bool {
    host.is_element(node)
        && host.has_attribute(node, &config.name_attribute())
        && !host.has_attribute(node, &config.skip_attribute())
        && !host.has_attribute(node, &config.finished_attribute())
}

/// Candidates already present in the document, in document order
pub fn enumerate<H: Host>(host: &H, config: &Config) -> Vec<H::Node> {
    host.query_attribute(&config.name_attribute())
        .into_iter()
        .filter(|&node| is_candidate(host, node, config))
        .collect()
}

/// Subscription to the host's mutation records
#[derive(Debug)]
pub struct MutationWatcher {
    _private: (),
}

impl MutationWatcher {
    /// Start observing the body subtree
    ///
    /// The subscription lives as long as the engine; there is no teardown.
    pub fn start<H: Host>(host: &mut H) -> Self {
        host.observe_mutations();
        tracing::debug!("mutation watcher started");
        Self { _private: () }
    }

    /// Inserted nodes from `records` that should get a trigger
    ///
    /// Only the added nodes themselves are considered, not their
    /// descendants. Text and other non-element nodes are skipped.
    pub fn inserted<H: Host>(
        &self,
        host: &H,
        records: &[HostMutation<H>],
        config: &Config,
    ) -> Vec<H::Node> {
        let mut nodes = Vec::new();
        for record in records {
            for &node in &record.added {
                if is_candidate(host, node, config) && !nodes.contains(&node) {
                    nodes.push(node);
                }
            }
        }
        nodes
    }
}
