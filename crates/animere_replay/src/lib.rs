//! Animere Replay
//!
//! Runs scripted scenarios against the engine and the headless document and
//! reports where every element ended up. A scenario is a JSON file
//! describing the page, the engine options and a list of steps (scrolling,
//! inserting and removing elements, animation end events, elapsed time).
//!
//! ```rust
//! use animere_replay::{Scenario, ScenarioRunner};
//!
//! let scenario = Scenario::from_json(r#"{
//!     "elements": [
//!         { "id": "hero", "attributes": { "data-animere": "bounce" },
//!           "rect": { "y": 1000, "width": 800, "height": 200 } }
//!     ],
//!     "steps": [{ "type": "scroll", "y": 700 }]
//! }"#).unwrap();
//!
//! let report = ScenarioRunner::new(scenario).unwrap().run().unwrap();
//! assert_eq!(report.element("hero").unwrap().state, Some("animating"));
//! ```

pub mod error;
pub mod runner;
pub mod scenario;

pub use error::{Result, ScenarioError};
pub use runner::{ElementReport, Report, ScenarioRunner, Totals};
pub use scenario::{ElementSpec, EnvironmentSpec, RectSpec, Scenario, Step, ViewportSpec};
