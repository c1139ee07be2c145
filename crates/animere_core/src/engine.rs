//! The Animere orchestrator
//!
//! [`Animere`] owns the configuration and one [`Trigger`] per observed
//! element. It is started explicitly by the host and then only reacts to the
//! notifications the host hands it:
//!
//! ```ignore
//! let config = Config::from_json(r#"{ "watchDOM": true }"#)?;
//! let mut animere = Animere::init(&mut document, config);
//!
//! // From the host's observer callbacks:
//! animere.handle_mutations(&mut document, &records);
//! animere.handle_intersections(&mut document, &entries);
//! ```

use std::time::Instant;

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::config::Config;
use crate::gate::{EnvironmentGate, InitGate};
use crate::host::{Host, HostEntry, HostMutation};
use crate::policy::Qualifier;
use crate::runner::AnimationRunner;
use crate::trigger::{Trigger, TriggerState};
use crate::watcher::{enumerate, is_candidate, MutationWatcher};

/// Scroll-triggered animation engine
pub struct Animere<H: Host> {
    config: Config,
    qualifier: Qualifier,
    runner: AnimationRunner,
    triggers: FxHashMap<H::Node, Trigger<H>>,
    watcher: Option<MutationWatcher>,
    active: bool,
}

impl<H: Host> Animere<H> {
    /// Start the engine behind the default [`EnvironmentGate`]
    pub fn init(host: &mut H, config: Config) -> Self {
        Self::init_with_gate(host, config, &EnvironmentGate)
    }

    /// Start the engine if `gate` allows it
    ///
    /// A declined engine stays inert: it attaches nothing and ignores every
    /// notification.
    pub fn init_with_gate(host: &mut H, config: Config, gate: &impl InitGate) -> Self {
        let mut engine = Self {
            qualifier: Qualifier::from_config(&config),
            runner: AnimationRunner::new(config.class_prefix()),
            config,
            triggers: FxHashMap::default(),
            watcher: None,
            active: false,
        };

        if !gate.should_init(&host.environment()) {
            info!("animere disabled by init gate");
            return engine;
        }

        engine.active = true;
        for node in enumerate(host, &engine.config) {
            engine.observe(host, node);
        }

        if engine.config.dynamic_watch() {
            engine.watcher = Some(MutationWatcher::start(host));
        }

        debug!(
            triggers = engine.triggers.len(),
            dynamic = engine.config.dynamic_watch(),
            "animere started"
        );
        engine
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn runner(&self) -> &AnimationRunner {
        &self.runner
    }

    /// Whether the init gate let the engine start
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    /// Number of triggers that have not finished yet
    pub fn trigger_count(&self) -> usize {
        self.triggers
            .values()
            .filter(|t| t.state() != TriggerState::Finished)
            .count()
    }

    pub fn trigger(&self, node: H::Node) -> Option<&Trigger<H>> {
        self.triggers.get(&node)
    }

    /// Lifecycle state of `node`
    ///
    /// Elements carrying the finished marker report `Finished` even after
    /// their trigger has been dropped.
    pub fn state_of(&self, host: &H, node: H::Node) -> Option<TriggerState> {
        if let Some(trigger) = self.triggers.get(&node) {
            return Some(trigger.state());
        }
        host.has_attribute(node, &self.config.finished_attribute())
            .then_some(TriggerState::Finished)
    }

    /// Attach a trigger to `node`
    ///
    /// Returns `false` when the engine is inert or the element already has a
    /// live trigger or has finished.
    pub fn observe(&mut self, host: &mut H, node: H::Node) -> bool {
        if !self.active {
            return false;
        }
        if let Some(existing) = self.triggers.get(&node) {
            if existing.state() != TriggerState::Finished {
                return false;
            }
        }
        if host.has_attribute(node, &self.config.finished_attribute()) {
            return false;
        }

        let trigger = Trigger::attach(host, node, &self.config);
        self.triggers.insert(node, trigger);
        true
    }

    /// Deliver intersection reports, timestamped with the wall clock
    ///
    /// Returns how many triggers qualified.
    pub fn handle_intersections(&mut self, host: &mut H, entries: &[HostEntry<H>]) -> usize {
        self.handle_intersections_at(host, entries, Instant::now())
    }

    /// Deliver intersection reports observed at `now`
    ///
    /// Animations that start here are timed from `now`, so a host driving
    /// [`Self::expire_overdue`] with its own clock must use it here too.
    pub fn handle_intersections_at(
        &mut self,
        host: &mut H,
        entries: &[HostEntry<H>],
        now: Instant,
    ) -> usize {
        if !self.active {
            return 0;
        }
        self.prune();

        let mut qualified = 0;
        for entry in entries {
            let Some(trigger) = self.triggers.get_mut(&entry.target) else {
                continue;
            };
            if trigger.handle(host, entry, &self.qualifier, &self.runner, &self.config, now) {
                qualified += 1;
            }
        }
        qualified
    }

    /// Deliver mutation records
    ///
    /// Attaches triggers to inserted candidates and releases pending triggers
    /// whose element left the document. Returns how many triggers were
    /// attached.
    pub fn handle_mutations(&mut self, host: &mut H, records: &[HostMutation<H>]) -> usize {
        if !self.active || self.watcher.is_none() {
            return 0;
        }
        self.prune();

        let inserted = match &self.watcher {
            Some(watcher) => watcher.inserted(host, records, &self.config),
            None => Vec::new(),
        };
        let mut attached = 0;
        for node in inserted {
            if self.observe(host, node) {
                attached += 1;
            }
        }

        let detached: Vec<H::Node> = self
            .triggers
            .iter()
            .filter(|(node, trigger)| {
                trigger.state() == TriggerState::Pending && !host.is_connected(**node)
            })
            .map(|(node, _)| *node)
            .collect();
        for node in detached {
            if let Some(mut trigger) = self.triggers.remove(&node) {
                trigger.release(host);
            }
        }

        if attached > 0 {
            debug!(attached, "triggers attached from mutations");
        }
        attached
    }

    /// Force-finish animations that outlived the configured timeout
    ///
    /// Does nothing without a `finish_timeout`. Returns how many animations
    /// were finished.
    pub fn expire_overdue(&mut self, host: &mut H, now: Instant) -> usize {
        let Some(timeout) = self.config.finish_timeout() else {
            return 0;
        };

        let mut expired = 0;
        for trigger in self.triggers.values_mut() {
            if trigger.is_overdue(now, timeout) && trigger.force_finish(host) {
                expired += 1;
            }
        }
        self.prune();
        expired
    }

    /// Re-check a single node against the candidate rules and attach it
    ///
    /// Useful for hosts that insert content without mutation observation.
    pub fn refresh(&mut self, host: &mut H, node: H::Node) -> bool {
        is_candidate(host, node, &self.config) && self.observe(host, node)
    }

    fn prune(&mut self) {
        self.triggers
            .retain(|_, trigger| trigger.state() != TriggerState::Finished);
    }
}
