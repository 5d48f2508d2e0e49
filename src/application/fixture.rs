//! Declarative hierarchy description.
//!
//! ```toml
//! [[node]]
//! key = "window"
//! label = "Main window"
//! role = "container"
//! frame = { x = 0, y = 0, width = 800, height = 600 }
//!
//! [[node]]
//! key = "ok"
//! parent = "window"
//! label = "OK"
//! role = "button"
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{NodeState, Rect, Role};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default, rename = "node")]
    pub nodes: Vec<FixtureNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureNode {
    /// Unique within the fixture; used for parent references and CLI lookups.
    pub key: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub state: NodeState,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub frame: Rect,
}

fn default_active() -> bool {
    true
}

impl Fixture {
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
