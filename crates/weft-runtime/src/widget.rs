//! Widget bookkeeping and option tables.
//!
//! Widgets are plain property bags here; rendering is the embedder's
//! concern. `conf` options map to property names, `pack` options to
//! layout entries. Unrecognized options are ignored.

use indexmap::IndexMap;
use tracing::{trace, warn};

use weft_vm::Value;

/// Recognized `conf` option keys and the property each writes.
const CONF_PROPS: &[(&str, &str)] = &[
    ("-text", "text"),
    ("-bg", "backgroundColor"),
    ("-fg", "color"),
    ("-font", "font"),
    ("-width", "width"),
    ("-height", "height"),
    ("-items", "items"),
    ("-value", "value"),
];

const STATES: &[&str] = &["normal", "disabled", "readonly"];
const SIDES: &[&str] = &["top", "bottom", "left", "right"];
const FILLS: &[&str] = &["x", "y", "both", "none"];

/// An in-memory widget: a kind tag plus configured properties and layout.
#[derive(Debug, Clone)]
pub struct Widget {
    kind: String,
    props: IndexMap<String, Value>,
    layout: IndexMap<String, Value>,
}

impl Widget {
    pub(crate) fn new(kind: &str, options: IndexMap<String, Value>) -> Self {
        Self {
            kind: kind.to_string(),
            props: options,
            layout: IndexMap::new(),
        }
    }

    /// The widget type tag (`LABEL`, `BUTTON`, ...).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Read a configured property.
    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    /// Read a layout entry.
    pub fn layout(&self, name: &str) -> Option<&Value> {
        self.layout.get(name)
    }

    /// Widgets are visible unless `-visible` said otherwise.
    pub fn is_visible(&self) -> bool {
        !matches!(self.props.get("visible"), Some(Value::Bool(false)))
    }

    /// Apply `conf` options.
    pub(crate) fn configure(&mut self, options: IndexMap<String, Value>) {
        for (key, value) in options {
            if let Some((_, prop)) = CONF_PROPS.iter().find(|(k, _)| *k == key) {
                self.props.insert((*prop).to_string(), value);
            } else if key == "-state" {
                match value.as_str() {
                    Some(state) if STATES.contains(&state) => {
                        self.props.insert("state".to_string(), value);
                    }
                    _ => warn!(%value, "invalid -state value ignored"),
                }
            } else if key == "-visible" {
                self.apply_visible(&value);
            } else {
                trace!(%key, "unrecognized conf option ignored");
            }
        }
    }

    fn apply_visible(&mut self, value: &Value) {
        let visible = match value.as_str() {
            Some("true") => true,
            Some("false") => false,
            Some("toggle") => !self.is_visible(),
            _ => {
                warn!(%value, "invalid -visible value ignored");
                return;
            }
        };
        self.props.insert("visible".to_string(), Value::Bool(visible));
    }

    /// Apply `pack` options.
    pub(crate) fn place(&mut self, options: IndexMap<String, Value>) {
        for (key, value) in options {
            match key.as_str() {
                "-side" => self.set_enum("side", value, SIDES),
                "-fill" => self.set_enum("fill", value, FILLS),
                "-anchor" => {
                    self.layout.insert("anchor".to_string(), value);
                }
                "-expand" => match value.as_str() {
                    Some("yes") => {
                        self.layout.insert("expand".to_string(), Value::Bool(true));
                    }
                    Some("no") => {
                        self.layout.insert("expand".to_string(), Value::Bool(false));
                    }
                    _ => warn!(%value, "invalid -expand value ignored"),
                },
                "-padx" | "-pady" | "-ipadx" | "-ipady" => {
                    self.set_padding(&key[1..], value);
                }
                _ => trace!(%key, "unrecognized pack option ignored"),
            }
        }
    }

    fn set_enum(&mut self, name: &str, value: Value, allowed: &[&str]) {
        match value.as_str() {
            Some(text) if allowed.contains(&text) => {
                self.layout.insert(name.to_string(), value);
            }
            _ => warn!(name, %value, "invalid pack option value ignored"),
        }
    }

    fn set_padding(&mut self, name: &str, value: Value) {
        let amount = match &value {
            Value::Num(n) => Some(*n),
            Value::Str(s) => s.parse::<f64>().ok(),
            _ => None,
        };
        match amount {
            Some(amount) => {
                self.layout.insert(name.to_string(), Value::Num(amount));
            }
            None => warn!(name, %value, "non-numeric padding ignored"),
        }
    }
}
