//! The in-memory host session.

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, error, warn};

use weft_compiler::Chunk;
use weft_vm::error::Result;
use weft_vm::host::{Host, HostError, HostResult, ProcDef};
use weft_vm::Value;

use crate::widget::Widget;

/// Completed fetch payload delivered by the embedder: a parsed response
/// body on success, an error message on failure.
pub type FetchResult = std::result::Result<Value, String>;

/// A fetch scheduled by `HTTP_GET`, awaiting completion.
#[derive(Debug, Clone)]
pub struct PendingFetch {
    pub url: String,
    /// Callback chunks keyed by dotted name (`.callback`, `.error`).
    /// Unrecognized names are registered but never fire.
    pub callbacks: IndexMap<String, Rc<Chunk>>,
}

/// In-memory implementation of the VM's host facade.
///
/// Owns all process-wide runtime state: the keyed reactive state with its
/// watcher lists, the widget registry, event handler bindings, the
/// procedure table, and the pending fetch queue.
#[derive(Default)]
pub struct Session {
    state: IndexMap<String, Value>,
    widgets: IndexMap<String, Widget>,
    handlers: IndexMap<String, IndexMap<String, Rc<Chunk>>>,
    watchers: IndexMap<String, Vec<Rc<Chunk>>>,
    procs: IndexMap<String, ProcDef>,
    pending_fetches: Vec<PendingFetch>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a compiled program against this session.
    pub fn run(&mut self, chunk: &Chunk) -> Result<()> {
        weft_vm::run(chunk, self)
    }

    /// Fire a widget event from the host side (e.g. a button click).
    ///
    /// The bound handler chunk runs to completion before this returns;
    /// state mutations it performs are visible to the next dispatch.
    pub fn dispatch_event(&mut self, widget: &str, event: &str) -> Result<()> {
        let handler = self
            .handlers
            .get(widget)
            .and_then(|events| events.get(event))
            .cloned();
        match handler {
            Some(chunk) => {
                debug!(widget, event, "event dispatch");
                weft_vm::run(&chunk, self)
            }
            None => Err(HostError::HandlerNotFound {
                widget: widget.to_string(),
                event: event.to_string(),
            }
            .into()),
        }
    }

    /// Fetches scheduled by `HTTP_GET` that have not completed yet, in
    /// scheduling order.
    pub fn pending_fetches(&self) -> &[PendingFetch] {
        &self.pending_fetches
    }

    /// Complete the pending fetch at `index`.
    ///
    /// Success writes `http_response` and runs the `.callback` chunk;
    /// failure writes `error` and runs the `.error` chunk. Either write
    /// fires watchers before the callback runs. A fetch without the
    /// matching callback completes silently.
    pub fn complete_fetch(&mut self, index: usize, result: FetchResult) -> Result<()> {
        if index >= self.pending_fetches.len() {
            return Err(HostError::FetchNotFound(index).into());
        }
        let fetch = self.pending_fetches.remove(index);
        let (state_key, callback_key, payload) = match result {
            Ok(body) => ("http_response", ".callback", body),
            Err(message) => ("error", ".error", Value::Str(message)),
        };
        debug!(url = %fetch.url, callback = callback_key, "fetch completed");
        self.set_state(state_key, payload)?;
        match fetch.callbacks.get(callback_key) {
            Some(chunk) => weft_vm::run(&chunk.clone(), self),
            None => Ok(()),
        }
    }

    /// Read the full reactive state, in insertion order.
    pub fn state(&self) -> &IndexMap<String, Value> {
        &self.state
    }

    /// Look up a widget.
    pub fn widget(&self, name: &str) -> Option<&Widget> {
        self.widgets.get(name)
    }
}

impl Host for Session {
    fn set_state(&mut self, name: &str, value: Value) -> HostResult<()> {
        debug!(name, %value, "state write");
        self.state.insert(name.to_string(), value);
        // Snapshot the list: a watcher may register further watchers for
        // this same entry, and those must not fire for the current write.
        let watchers = self.watchers.get(name).cloned().unwrap_or_default();
        for watcher in watchers {
            if let Err(err) = weft_vm::run(&watcher, self) {
                error!(name, %err, "watcher failed");
            }
        }
        Ok(())
    }

    fn get_state(&self, name: &str) -> Option<Value> {
        self.state.get(name).cloned()
    }

    fn create_widget(
        &mut self,
        name: &str,
        kind: &str,
        options: IndexMap<String, Value>,
    ) -> HostResult<()> {
        if self.widgets.contains_key(name) {
            warn!(name, "widget overwritten");
        }
        debug!(name, kind, "widget created");
        self.widgets
            .insert(name.to_string(), Widget::new(kind, options));
        Ok(())
    }

    fn update_widget(&mut self, name: &str, options: IndexMap<String, Value>) -> HostResult<()> {
        let widget = self
            .widgets
            .get_mut(name)
            .ok_or_else(|| HostError::WidgetNotFound(name.to_string()))?;
        widget.configure(options);
        Ok(())
    }

    fn pack_widget(&mut self, name: &str, options: IndexMap<String, Value>) -> HostResult<()> {
        let widget = self
            .widgets
            .get_mut(name)
            .ok_or_else(|| HostError::WidgetNotFound(name.to_string()))?;
        widget.place(options);
        Ok(())
    }

    fn bind_widget(
        &mut self,
        name: &str,
        handlers: IndexMap<String, Rc<Chunk>>,
    ) -> HostResult<()> {
        if !self.widgets.contains_key(name) {
            return Err(HostError::WidgetNotFound(name.to_string()));
        }
        debug!(name, events = handlers.len(), "handlers bound");
        self.handlers
            .entry(name.to_string())
            .or_default()
            .extend(handlers);
        Ok(())
    }

    fn watch_state(&mut self, name: &str, watcher: Rc<Chunk>) {
        debug!(name, "watcher registered");
        self.watchers
            .entry(name.to_string())
            .or_default()
            .push(watcher);
    }

    fn define_proc(&mut self, name: &str, def: ProcDef) {
        debug!(name, params = def.params.len(), "procedure defined");
        self.procs.insert(name.to_string(), def);
    }

    fn proc(&self, name: &str) -> Option<ProcDef> {
        self.procs.get(name).cloned()
    }

    fn http_get(&mut self, url: &str, callbacks: IndexMap<String, Rc<Chunk>>) {
        debug!(url, callbacks = callbacks.len(), "fetch queued");
        self.pending_fetches.push(PendingFetch {
            url: url.to_string(),
            callbacks,
        });
    }
}
