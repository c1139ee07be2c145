//! Scenario file format
//!
//! A scenario describes a page and what happens to it:
//!
//! ```json
//! {
//!   "options": { "watchDOM": true },
//!   "viewport": { "width": 800, "height": 600 },
//!   "elements": [
//!     { "id": "hero", "attributes": { "data-animere": "bounce" },
//!       "rect": { "y": 1000, "width": 800, "height": 200 } }
//!   ],
//!   "steps": [
//!     { "type": "scroll", "y": 700 },
//!     { "type": "animationEnd", "id": "hero" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use animere_core::{AnimereOptions, Environment, Rect};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scenario {
    pub name: Option<String>,
    /// Engine options, same shape as the script-tag options object
    pub options: AnimereOptions,
    pub environment: EnvironmentSpec,
    pub viewport: ViewportSpec,
    /// Elements present before the engine starts, in document order
    pub elements: Vec<ElementSpec>,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_json(&source)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvironmentSpec {
    pub reduced_motion: bool,
    pub supports_scroll: bool,
    pub user_agent: String,
}

impl Default for EnvironmentSpec {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            supports_scroll: true,
            user_agent: String::new(),
        }
    }
}

impl From<&EnvironmentSpec> for Environment {
    fn from(env: &EnvironmentSpec) -> Self {
        Environment::interactive()
            .with_reduced_motion(env.reduced_motion)
            .with_scroll_support(env.supports_scroll)
            .with_user_agent(env.user_agent.clone())
    }
}

/// Viewport position and size in document coordinates
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 800.0,
            height: 600.0,
        }
    }
}

impl From<ViewportSpec> for Rect {
    fn from(v: ViewportSpec) -> Self {
        Rect::new(v.x, v.y, v.width, v.height)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<RectSpec> for Rect {
    fn from(r: RectSpec) -> Self {
        Rect::new(r.x, r.y, r.width, r.height)
    }
}

fn default_tag() -> String {
    "div".to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSpec {
    pub id: String,
    #[serde(default = "default_tag")]
    pub tag: String,
    /// Attributes in source order
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
    #[serde(default)]
    pub rect: RectSpec,
    /// Id of the parent element; the body when absent
    #[serde(default)]
    pub parent: Option<String>,
}

/// One thing that happens to the page
///
/// The runner delivers pending notifications to the engine after every
/// step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Step {
    /// Scroll the viewport to an absolute position
    Scroll {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
    /// Insert a new element
    Insert { element: ElementSpec },
    /// Detach an element from the document
    Remove { id: String },
    /// Fire `animationend` on one element, or on every animating element
    #[serde(rename_all = "camelCase")]
    AnimationEnd {
        #[serde(default)]
        id: Option<String>,
    },
    /// Let time pass and force-finish animations past their timeout
    #[serde(rename_all = "camelCase")]
    Expire { after_ms: u64 },
    SetAttribute {
        id: String,
        name: String,
        value: String,
    },
    RemoveAttribute { id: String, name: String },
}
