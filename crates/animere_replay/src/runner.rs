//! Scenario execution and reporting

use std::fmt;
use std::time::{Duration, Instant};

use animere_core::{Animere, Config, TriggerState};
use animere_dom::{end_animations, flush_at, Document, NodeId};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, ScenarioError};
use crate::scenario::{ElementSpec, Scenario, Step};

/// Running totals over a replay
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub steps: usize,
    pub attached: usize,
    pub qualified: usize,
    pub animation_ends: usize,
    pub expired: usize,
}

/// Final state of one scenario element
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementReport {
    pub id: String,
    /// `pending`, `qualifying`, `animating`, `finished`, or `None` when the
    /// element never had a trigger
    pub state: Option<&'static str>,
    pub classes: Vec<String>,
    pub visibility: Option<String>,
    /// `--animate-*` properties in write order
    pub custom_properties: IndexMap<String, String>,
    pub finished: bool,
    pub connected: bool,
}

/// Outcome of a replay
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub name: Option<String>,
    /// Whether the init gate let the engine start
    pub active: bool,
    pub totals: Totals,
    pub elements: Vec<ElementReport>,
}

impl Report {
    pub fn element(&self, id: &str) -> Option<&ElementReport> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            writeln!(f, "Scenario: {}", name)?;
        }
        writeln!(
            f,
            "Engine {} | {} steps, {} attached, {} qualified, {} ended, {} expired",
            if self.active { "active" } else { "inactive" },
            self.totals.steps,
            self.totals.attached,
            self.totals.qualified,
            self.totals.animation_ends,
            self.totals.expired,
        )?;

        for element in &self.elements {
            let mark = if element.finished { "✓" } else { " " };
            write!(
                f,
                "  {} {:<16} {:<11}",
                mark,
                element.id,
                element.state.unwrap_or("-")
            )?;
            if let Some(visibility) = &element.visibility {
                write!(f, " visibility={}", visibility)?;
            }
            if !element.classes.is_empty() {
                write!(f, " class=\"{}\"", element.classes.join(" "))?;
            }
            for (property, value) in &element.custom_properties {
                write!(f, " {}={}", property, value)?;
            }
            if !element.connected {
                write!(f, " (detached)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

const CUSTOM_PROPERTY_PREFIX: &str = "--animate-";

fn state_name(state: TriggerState) -> &'static str {
    match state {
        TriggerState::Pending => "pending",
        TriggerState::Qualifying => "qualifying",
        TriggerState::Animating => "animating",
        TriggerState::Finished => "finished",
    }
}

/// Replays a [`Scenario`] against a headless document
pub struct ScenarioRunner {
    doc: Document,
    engine: Animere<Document>,
    ids: IndexMap<String, NodeId>,
    steps: Vec<Step>,
    name: Option<String>,
    totals: Totals,
    /// Simulated time elapsed through `expire` steps
    elapsed: Duration,
    started: Instant,
}

impl ScenarioRunner {
    /// Build the page and start the engine
    ///
    /// Initial elements exist before the engine starts, so they are picked
    /// up by the initial scan rather than as mutations.
    pub fn new(scenario: Scenario) -> Result<Self> {
        let config = Config::from_options(scenario.options)?;
        let mut doc = Document::new(scenario.viewport.into())
            .with_environment((&scenario.environment).into());

        let mut ids = IndexMap::new();
        for element in &scenario.elements {
            insert_element(&mut doc, &mut ids, element)?;
        }

        let started = Instant::now();
        let engine = Animere::init(&mut doc, config);
        info!(
            active = engine.is_active(),
            elements = ids.len(),
            "scenario loaded"
        );

        let mut runner = Self {
            doc,
            engine,
            ids,
            steps: scenario.steps,
            name: scenario.name,
            totals: Totals::default(),
            elapsed: Duration::ZERO,
            started,
        };
        runner.flush();
        Ok(runner)
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn engine(&self) -> &Animere<Document> {
        &self.engine
    }

    pub fn node(&self, id: &str) -> Result<NodeId> {
        self.ids
            .get(id)
            .copied()
            .ok_or_else(|| ScenarioError::UnknownElement(id.to_string()))
    }

    /// Run every step and report the final state
    pub fn run(mut self) -> Result<Report> {
        let steps = std::mem::take(&mut self.steps);
        for step in &steps {
            self.apply(step)?;
        }
        Ok(self.report())
    }

    /// Apply one step, then deliver pending notifications
    pub fn apply(&mut self, step: &Step) -> Result<()> {
        debug!(?step, "step");
        match step {
            Step::Scroll { x, y } => self.doc.scroll_to(*x, *y),
            Step::Insert { element } => {
                insert_element(&mut self.doc, &mut self.ids, element)?;
            }
            Step::Remove { id } => {
                let node = self.node(id)?;
                self.doc.remove(node);
            }
            Step::AnimationEnd { id: Some(id) } => {
                let node = self.node(id)?;
                self.totals.animation_ends += self.doc.dispatch_animation_end(node);
            }
            Step::AnimationEnd { id: None } => {
                self.totals.animation_ends += end_animations(&mut self.doc);
            }
            Step::Expire { after_ms } => {
                self.elapsed += Duration::from_millis(*after_ms);
                let now = self.now();
                self.totals.expired += self.engine.expire_overdue(&mut self.doc, now);
            }
            Step::SetAttribute { id, name, value } => {
                let node = self.node(id)?;
                self.doc.set_attribute(node, name, value);
            }
            Step::RemoveAttribute { id, name } => {
                let node = self.node(id)?;
                self.doc.remove_attribute(node, name);
            }
        }

        self.totals.steps += 1;
        self.flush();
        Ok(())
    }

    /// Simulated time of the replay; every timed engine call uses it
    pub fn now(&self) -> Instant {
        self.started + self.elapsed
    }

    fn flush(&mut self) {
        let now = self.now();
        let stats = flush_at(&mut self.doc, &mut self.engine, now);
        self.totals.attached += stats.attached;
        self.totals.qualified += stats.qualified;
    }

    /// Snapshot of every named element
    pub fn report(&self) -> Report {
        let elements = self
            .ids
            .iter()
            .map(|(id, &node)| self.element_report(id, node))
            .collect();

        Report {
            name: self.name.clone(),
            active: self.engine.is_active(),
            totals: self.totals,
            elements,
        }
    }

    fn element_report(&self, id: &str, node: NodeId) -> ElementReport {
        let finished_attribute = self.engine.config().finished_attribute();
        let custom_properties = self
            .doc
            .style_properties(node)
            .into_iter()
            .filter(|(property, _)| property.starts_with(CUSTOM_PROPERTY_PREFIX))
            .map(|(property, value)| (property.to_string(), value.to_string()))
            .collect();

        ElementReport {
            id: id.to_string(),
            state: self.engine.state_of(&self.doc, node).map(state_name),
            classes: self.doc.classes(node).into_iter().map(String::from).collect(),
            visibility: self.doc.style(node, "visibility").map(String::from),
            custom_properties,
            finished: self.doc.has_attribute(node, &finished_attribute),
            connected: self.doc.is_connected(node),
        }
    }
}

fn insert_element(
    doc: &mut Document,
    ids: &mut IndexMap<String, NodeId>,
    element: &ElementSpec,
) -> Result<NodeId> {
    if ids.contains_key(&element.id) {
        return Err(ScenarioError::DuplicateId(element.id.clone()));
    }
    let parent = match &element.parent {
        Some(parent) => ids
            .get(parent)
            .copied()
            .ok_or_else(|| ScenarioError::UnknownElement(parent.clone()))?,
        None => doc.body(),
    };

    let node = doc.create_element(&element.tag);
    for (name, value) in &element.attributes {
        doc.set_attribute(node, name, value);
    }
    doc.set_rect(node, element.rect.into());
    doc.append_child(parent, node);

    ids.insert(element.id.clone(), node);
    Ok(node)
}
