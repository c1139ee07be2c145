//! Intersection trigger
//!
//! One trigger per observed element, driven through a fixed lifecycle:
//!
//! ```text
//! attach ──► Pending ──(first qualifying report)──► Qualifying
//!                                                       │ overrides applied,
//!                                                       │ element shown
//!                                                       ▼
//!            Finished ◄──(animationend / timeout)── Animating
//! ```
//!
//! The trigger owns its observer handle. The handle is taken and released
//! the moment the first qualifying report arrives, before anything else
//! happens, so a burst of reports can never start two animations.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::host::{Host, HostEntry};
use crate::policy::Qualifier;
use crate::resolver::resolve;
use crate::runner::{AnimationRunner, Completion};

/// Inline style property toggled around qualification
pub const VISIBILITY: &str = "visibility";

/// Lifecycle state of a [`Trigger`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TriggerState {
    /// Hidden and observed, waiting for a qualifying report
    Pending,
    /// Observation released, directive being applied
    Qualifying,
    /// Classes applied, waiting for the animation to end
    Animating,
    /// Terminal
    Finished,
}

/// Observation lifecycle for one element
pub struct Trigger<H: Host> {
    node: H::Node,
    observer: Option<H::Observer>,
    state: Rc<Cell<TriggerState>>,
    completion: Option<Completion<H>>,
    animating_since: Option<Instant>,
}

impl<H: Host> Trigger<H> {
    /// Hide `node` and start observing it
    ///
    /// The element is hidden before the observer exists so it can never be
    /// painted visible ahead of its first check.
    pub fn attach(host: &mut H, node: H::Node, config: &Config) -> Self {
        host.set_style_property(node, VISIBILITY, "hidden");
        let reporting = Qualifier::from_config(config).reporting();
        let observer = host.observe_intersection(node, reporting);

        debug!(?node, ?observer, "trigger attached");

        Self {
            node,
            observer: Some(observer),
            state: Rc::new(Cell::new(TriggerState::Pending)),
            completion: None,
            animating_since: None,
        }
    }

    pub fn node(&self) -> H::Node {
        self.node
    }

    pub fn state(&self) -> TriggerState {
        self.state.get()
    }

    /// Observer handle while still pending
    pub fn observer(&self) -> Option<H::Observer> {
        self.observer
    }

    /// Completion of the running animation, once animating
    pub fn completion(&self) -> Option<&Completion<H>> {
        self.completion.as_ref()
    }

    /// Feed one intersection report delivered at `now`
    ///
    /// Returns `true` if the report moved the trigger out of `Pending`.
    pub fn handle(
        &mut self,
        host: &mut H,
        entry: &HostEntry<H>,
        qualifier: &Qualifier,
        runner: &AnimationRunner,
        config: &Config,
        now: Instant,
    ) -> bool {
        if self.state.get() != TriggerState::Pending {
            trace!(node = ?self.node, state = ?self.state.get(), "report after qualification ignored");
            return false;
        }
        if self.observer != Some(entry.observer) {
            trace!(node = ?self.node, observer = ?entry.observer, "stale observer report ignored");
            return false;
        }
        if !qualifier.qualifies(entry) {
            return false;
        }

        self.state.set(TriggerState::Qualifying);
        if let Some(observer) = self.observer.take() {
            host.unobserve_intersection(observer);
        }

        let node = self.node;
        let Some(directive) = resolve(host, node, config) else {
            // Prefix attribute removed while pending: show it, nothing to run
            debug!(?node, "qualified element has no animation name");
            host.set_style_property(node, VISIBILITY, "visible");
            self.state.set(TriggerState::Finished);
            return true;
        };

        directive.apply(host, node);
        host.set_style_property(node, VISIBILITY, "visible");
        self.state.set(TriggerState::Animating);
        self.animating_since = Some(now);

        debug!(
            ?node,
            animation = %directive.animation_name,
            overrides = directive.overrides.len(),
            "trigger qualified"
        );

        let state = Rc::clone(&self.state);
        let marker = config.finished_attribute();
        self.completion = Some(runner.run_with(
            host,
            node,
            &directive.animation_name,
            move |host: &mut H, node: H::Node| {
                host.set_attribute(node, &marker, "true");
                state.set(TriggerState::Finished);
            },
        ));

        true
    }

    /// Drop the observation of a trigger that never qualified
    ///
    /// Returns `false` (and does nothing) once the trigger has left `Pending`.
    pub fn release(&mut self, host: &mut H) -> bool {
        if self.state.get() != TriggerState::Pending {
            return false;
        }
        if let Some(observer) = self.observer.take() {
            host.unobserve_intersection(observer);
        }
        debug!(node = ?self.node, "pending trigger released");
        true
    }

    /// Whether the animation has been running for longer than `timeout`
    ///
    /// `now` must come from the same clock that was passed to [`Self::handle`].
    pub fn is_overdue(&self, now: Instant, timeout: Duration) -> bool {
        self.state.get() == TriggerState::Animating
            && self
                .animating_since
                .is_some_and(|since| now.saturating_duration_since(since) >= timeout)
    }

    /// Finish an animation whose end event never arrived
    pub fn force_finish(&mut self, host: &mut H) -> bool {
        if self.state.get() != TriggerState::Animating {
            return false;
        }
        let Some(completion) = &self.completion else {
            return false;
        };
        warn!(node = ?self.node, "animation end never fired, finishing");
        completion.finish(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Axis;
    use crate::host::Reporting;
    use crate::testing::MockHost;

    struct Fixture {
        config: Config,
        qualifier: Qualifier,
        runner: AnimationRunner,
    }

    impl Fixture {
        fn new(config: Config) -> Self {
            Self {
                qualifier: Qualifier::from_config(&config),
                runner: AnimationRunner::new(config.class_prefix()),
                config,
            }
        }

        fn feed(&self, host: &mut MockHost, trigger: &mut Trigger<MockHost>, ratio: f64) -> bool {
            self.feed_at(host, trigger, ratio, Instant::now())
        }

        fn feed_at(
            &self,
            host: &mut MockHost,
            trigger: &mut Trigger<MockHost>,
            ratio: f64,
            now: Instant,
        ) -> bool {
            let entry = host.entry(trigger.node(), ratio);
            trigger.handle(host, &entry, &self.qualifier, &self.runner, &self.config, now)
        }
    }

    #[test]
    fn test_attach_hides_before_observing() {
        let mut host = MockHost::new();
        let node = host.element(&[("data-animere", "bounce")]);
        let trigger = Trigger::attach(&mut host, node, &Config::default());

        assert_eq!(trigger.state(), TriggerState::Pending);
        assert_eq!(host.log, ["style visibility=hidden", "observe"]);
        assert!(trigger.observer().is_some());
    }

    #[test]
    fn test_full_lifecycle() {
        let fixture = Fixture::new(Config::default());
        let mut host = MockHost::new();
        let node = host.element(&[("data-animere", "bounce"), ("data-animere-delay", "2s")]);
        let mut trigger = Trigger::attach(&mut host, node, &fixture.config);

        assert!(!fixture.feed(&mut host, &mut trigger, 0.1));
        assert_eq!(trigger.state(), TriggerState::Pending);

        assert!(fixture.feed(&mut host, &mut trigger, 1.0));
        assert_eq!(trigger.state(), TriggerState::Animating);
        assert_eq!(host.observer_count(), 0);
        assert_eq!(host.style_property(node, "visibility").as_deref(), Some("visible"));
        assert_eq!(host.style_property(node, "--animate-delay").as_deref(), Some("2s"));
        assert_eq!(
            host.style_property(node, "animation-delay").as_deref(),
            Some("var(--animate-delay)")
        );
        assert_eq!(host.classes(node), ["animate__animated", "animate__bounce"]);
        assert_eq!(host.attribute(node, "data-animere-finished"), None);

        host.fire_animation_end(node);
        assert_eq!(trigger.state(), TriggerState::Finished);
        assert!(host.classes(node).is_empty());
        assert_eq!(
            host.attribute(node, "data-animere-finished").as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_qualifying_precedes_runner() {
        let fixture = Fixture::new(Config::default());
        let mut host = MockHost::new();
        let node = host.element(&[("data-animere", "fadeIn"), ("data-animere-repeat", "2")]);
        let mut trigger = Trigger::attach(&mut host, node, &fixture.config);
        host.log.clear();

        fixture.feed(&mut host, &mut trigger, 1.0);
        assert_eq!(
            host.log,
            [
                "unobserve",
                "style --animate-repeat=2",
                "style animation-iteration-count=var(--animate-repeat)",
                "style visibility=visible",
                "add animate__animated",
                "add animate__fadeIn",
            ]
        );
    }

    #[test]
    fn test_burst_of_reports_runs_once() {
        let fixture = Fixture::new(Config::default());
        let mut host = MockHost::new();
        let node = host.element(&[("data-animere", "bounce")]);
        let mut trigger = Trigger::attach(&mut host, node, &fixture.config);
        let observer = trigger.observer().unwrap();

        let entry = visible_entry(node, observer);
        let now = Instant::now();
        assert!(trigger.handle(&mut host, &entry, &fixture.qualifier, &fixture.runner, &fixture.config, now));
        assert!(!trigger.handle(&mut host, &entry, &fixture.qualifier, &fixture.runner, &fixture.config, now));
        assert!(!trigger.handle(&mut host, &entry, &fixture.qualifier, &fixture.runner, &fixture.config, now));

        assert_eq!(host.class_adds, 2);
        assert_eq!(host.pending_listeners(), 1);
    }

    #[test]
    fn test_zero_ratio_keeps_pending() {
        let fixture = Fixture::new(Config::default());
        let mut host = MockHost::new();
        let node = host.element(&[("data-animere", "bounce")]);
        let mut trigger = Trigger::attach(&mut host, node, &fixture.config);

        assert!(!fixture.feed(&mut host, &mut trigger, 0.0));
        assert_eq!(trigger.state(), TriggerState::Pending);
        assert_eq!(host.style_property(node, "visibility").as_deref(), Some("hidden"));
    }

    #[test]
    fn test_stale_observer_ignored() {
        let fixture = Fixture::new(Config::default());
        let mut host = MockHost::new();
        let node = host.element(&[("data-animere", "bounce")]);
        let mut trigger = Trigger::attach(&mut host, node, &fixture.config);

        let mut entry = host.entry(node, 1.0);
        entry.observer += 100;
        assert!(!trigger.handle(
            &mut host,
            &entry,
            &fixture.qualifier,
            &fixture.runner,
            &fixture.config,
            Instant::now()
        ));
        assert_eq!(trigger.state(), TriggerState::Pending);
    }

    #[test]
    fn test_missing_name_shows_without_animating() {
        let fixture = Fixture::new(Config::default());
        let mut host = MockHost::new();
        let node = host.element(&[("data-animere", "bounce")]);
        let mut trigger = Trigger::attach(&mut host, node, &fixture.config);
        host.clear_attributes(node);

        assert!(fixture.feed(&mut host, &mut trigger, 1.0));
        assert_eq!(trigger.state(), TriggerState::Finished);
        assert_eq!(host.style_property(node, "visibility").as_deref(), Some("visible"));
        assert_eq!(host.class_adds, 0);
        assert_eq!(host.attribute(node, "data-animere-finished"), None);
    }

    #[test]
    fn test_release_only_when_pending() {
        let fixture = Fixture::new(Config::default());
        let mut host = MockHost::new();
        let a = host.element(&[("data-animere", "bounce")]);
        let b = host.element(&[("data-animere", "bounce")]);
        let mut pending = Trigger::attach(&mut host, a, &fixture.config);
        let mut animating = Trigger::attach(&mut host, b, &fixture.config);
        fixture.feed(&mut host, &mut animating, 1.0);

        assert!(pending.release(&mut host));
        assert!(!pending.release(&mut host));
        assert!(!animating.release(&mut host));
        assert_eq!(host.observer_count(), 0);
    }

    #[test]
    fn test_force_finish_after_timeout() {
        let fixture = Fixture::new(Config::default());
        let mut host = MockHost::new();
        let node = host.element(&[("data-animere", "bounce")]);
        let mut trigger = Trigger::attach(&mut host, node, &fixture.config);
        let timeout = Duration::from_millis(500);
        let start = Instant::now();

        assert!(!trigger.is_overdue(start + timeout, timeout));
        fixture.feed_at(&mut host, &mut trigger, 1.0, start);
        assert!(trigger.is_overdue(start + timeout, timeout));

        assert!(trigger.force_finish(&mut host));
        assert_eq!(trigger.state(), TriggerState::Finished);
        assert!(host.classes(node).is_empty());
        assert!(host.has_attribute(node, "data-animere-finished"));

        // The late real event is a no-op
        host.fire_animation_end(node);
        assert_eq!(host.class_removes, 2);
        assert!(!trigger.force_finish(&mut host));
    }

    #[test]
    fn test_overdue_measured_from_qualification_time() {
        let fixture = Fixture::new(Config::default());
        let mut host = MockHost::new();
        let node = host.element(&[("data-animere", "bounce")]);
        let mut trigger = Trigger::attach(&mut host, node, &fixture.config);
        let timeout = Duration::from_secs(1);

        // Qualifies late on a simulated clock
        let qualified_at = Instant::now() + Duration::from_secs(5);
        fixture.feed_at(&mut host, &mut trigger, 1.0, qualified_at);

        assert!(!trigger.is_overdue(qualified_at + Duration::from_millis(100), timeout));
        assert!(trigger.is_overdue(qualified_at + timeout, timeout));
    }

    #[test]
    fn test_axis_config_observes_continuously() {
        let mut host = MockHost::new();
        let a = host.element(&[("data-animere", "bounce")]);
        let b = host.element(&[("data-animere", "bounce")]);

        Trigger::attach(&mut host, a, &Config::default());
        let axis = Config::builder().axis(Axis::Y).build().unwrap();
        Trigger::attach(&mut host, b, &axis);

        assert_eq!(host.reporting_of(a), Some(Reporting::Threshold(0.2)));
        assert_eq!(host.reporting_of(b), Some(Reporting::Continuous));
    }

    fn visible_entry(node: u32, observer: u32) -> HostEntry<MockHost> {
        crate::host::IntersectionEntry {
            target: node,
            observer,
            is_intersecting: true,
            intersection_ratio: 1.0,
            bounding_rect: crate::geometry::Rect::new(0.0, 0.0, 10.0, 10.0),
            root_bounds: crate::geometry::Rect::new(0.0, 0.0, 100.0, 100.0),
        }
    }
}
