//! In-memory host runtime for the weft VM.
//!
//! [`Session`] implements the VM's host facade: reactive state with
//! watchers, a widget registry, a procedure table, and a pending fetch
//! queue. Event dispatch and fetch completion re-enter the VM from the
//! host side, modeling the embedder's event loop. Execution is
//! single-threaded and cooperative; every nested invocation runs to
//! completion before control returns.

mod session;
mod widget;

pub use session::{FetchResult, PendingFetch, Session};
pub use widget::Widget;
