//! Integration test harness for weft.
//!
//! Provides utilities for end-to-end testing of the full pipeline:
//! parse → compile → run → observe host effects.

use weft_compiler::Chunk;
use weft_runtime::{FetchResult, Session};
use weft_vm::{Host, Value};

/// Test harness wrapping a compiled program and the session it ran in.
pub struct TestHarness {
    session: Session,
    chunk: Chunk,
}

impl TestHarness {
    /// Compile source and run it against a fresh session.
    ///
    /// # Panics
    ///
    /// Panics if parsing, compilation, or execution fails.
    pub fn run_source(source: &str) -> Self {
        let program = weft_parser::parse(source).expect("parse failed");
        let chunk = weft_compiler::compile(&program).expect("compile failed");
        let mut session = Session::new();
        session.run(&chunk).expect("execution failed");
        Self { session, chunk }
    }

    /// Dispatch a click on a widget.
    ///
    /// # Panics
    ///
    /// Panics if no click handler is bound.
    pub fn click(&mut self, widget: &str) {
        self.session
            .dispatch_event(widget, "click")
            .expect("click dispatch failed");
    }

    /// Write a state entry from the host side, firing watchers.
    pub fn set_state(&mut self, name: &str, value: Value) {
        Host::set_state(&mut self.session, name, value).expect("state write failed");
    }

    /// Read a state entry.
    pub fn state(&self, name: &str) -> Option<&Value> {
        self.session.state().get(name)
    }

    /// Read a state entry as a string.
    pub fn state_str(&self, name: &str) -> Option<&str> {
        self.state(name).and_then(Value::as_str)
    }

    /// Read a widget property.
    pub fn widget_prop(&self, widget: &str, prop: &str) -> Option<&Value> {
        self.session.widget(widget).and_then(|w| w.prop(prop))
    }

    /// Complete the oldest pending fetch.
    ///
    /// # Panics
    ///
    /// Panics if no fetch is pending or a callback fails.
    pub fn complete_fetch(&mut self, result: FetchResult) {
        self.session
            .complete_fetch(0, result)
            .expect("fetch completion failed");
    }

    /// Number of fetches awaiting completion.
    pub fn pending_fetch_count(&self) -> usize {
        self.session.pending_fetches().len()
    }

    /// The session, for direct inspection.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The session, for host-side calls the helpers don't cover.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// The compiled top-level chunk.
    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }
}
