//! The runtime facade consumed by the VM.

use std::rc::Rc;

use indexmap::IndexMap;
use thiserror::Error;

use weft_compiler::Chunk;

use crate::value::Value;

/// Host result type.
pub type HostResult<T> = std::result::Result<T, HostError>;

/// A failure surfaced from the runtime facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("widget not found: {0}")]
    WidgetNotFound(String),

    #[error("no `{event}` handler bound on widget `{widget}`")]
    HandlerNotFound { widget: String, event: String },

    #[error("no pending fetch at index {0}")]
    FetchNotFound(usize),
}

/// A stored procedure: declared parameters and the compiled body.
#[derive(Debug, Clone)]
pub struct ProcDef {
    pub params: Vec<String>,
    pub chunk: Rc<Chunk>,
}

/// Capability set the VM executes against.
///
/// Hosts implement widget bookkeeping, reactive state with watchers,
/// procedure storage, and fetch scheduling. Tests substitute a recording
/// stub; `weft-runtime` provides the in-memory session.
pub trait Host {
    /// Write a state entry, then fire its watchers in registration order.
    /// A watcher failure is reported per invocation and must not prevent
    /// later watchers from firing.
    fn set_state(&mut self, name: &str, value: Value) -> HostResult<()>;

    /// Read a state entry. Absent entries read as `None`.
    fn get_state(&self, name: &str) -> Option<Value>;

    /// Create a widget. Duplicate names may overwrite or fail at the
    /// host's discretion.
    fn create_widget(
        &mut self,
        name: &str,
        kind: &str,
        options: IndexMap<String, Value>,
    ) -> HostResult<()>;

    /// Reconfigure a widget. Keys carry their leading `-`.
    fn update_widget(&mut self, name: &str, options: IndexMap<String, Value>) -> HostResult<()>;

    /// Apply layout to a widget. Keys carry their leading `-`.
    fn pack_widget(&mut self, name: &str, options: IndexMap<String, Value>) -> HostResult<()>;

    /// Register event handlers for a widget. Keys carry no leading dot.
    fn bind_widget(
        &mut self,
        name: &str,
        handlers: IndexMap<String, Rc<Chunk>>,
    ) -> HostResult<()>;

    /// Append a watcher to the list for a state entry.
    fn watch_state(&mut self, name: &str, watcher: Rc<Chunk>);

    /// Store a procedure definition.
    fn define_proc(&mut self, name: &str, def: ProcDef);

    /// Look up a procedure for `CALL_PROC`.
    fn proc(&self, name: &str) -> Option<ProcDef>;

    /// Schedule an asynchronous fetch. Keys keep their leading dot; on
    /// completion the host writes `http_response` or `error` state and
    /// invokes the matching callback chunk.
    fn http_get(&mut self, url: &str, callbacks: IndexMap<String, Rc<Chunk>>);
}
