//! Bytecode instruction set and chunk layout.
//!
//! Stack-based encoding: each instruction carries at most one small
//! integer operand, either an index into the owning chunk's constant pool
//! or a count of stack items to consume.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Index into a chunk's constant pool.
pub type ConstIdx = u16;

/// Bytecode instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    /// Push `constants[idx]` onto the stack.
    PushConst(ConstIdx),
    /// Push the state entry named by `constants[idx]`; absent entries
    /// push null. Substitution is deferred to execution time.
    PushVar(ConstIdx),
    /// Pop and discard the top of stack.
    Pop,
    /// Pop `name`, pop `value`, write the state entry and fire watchers.
    SetState,
    /// Pop `n` (value, key) pairs, push the assembled object.
    BuildObj(u16),
    /// Pop `name`, `type`, `options`; create the widget.
    CreateWidget,
    /// Pop `name`, `options`; reconfigure the widget.
    UpdateWidget,
    /// Pop `name`, `options`; apply layout to the widget.
    PackWidget,
    /// Push `constants[idx]`, which must be a chunk.
    DefBlock(ConstIdx),
    /// Pop `widget name`, then `n` (chunk, event) pairs; register event
    /// handlers. Event names lose their leading `.` at registration.
    BindWidget(u16),
    /// Pop `variable name`, pop `chunk`; register a watcher.
    WatchState,
    /// Pop `proc name`, `n` parameter names, then `chunk`; define a
    /// procedure.
    DefProc(u16),
    /// Pop `proc name`, then `n` arguments; invoke a procedure or
    /// builtin.
    CallProc(u16),
    /// Pop `url`, then `n` (chunk, callback name) pairs; schedule an
    /// asynchronous fetch. Callback names keep their leading `.`.
    HttpGet(u16),
}

/// A pooled constant.
///
/// Scalars deduplicate by value, objects and lists by deep structural
/// equality. Chunks are appended without deduplication: each block site
/// constructs a fresh chunk and sharing is never required for
/// correctness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Str(String),
    Num(f64),
    /// Insertion-ordered option-key to constant mapping.
    Obj(IndexMap<String, Constant>),
    List(Vec<Constant>),
    /// A nested chunk with its own isolated pool.
    Chunk(Chunk),
}

/// A compiled instruction sequence with its constant pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// The instruction sequence.
    pub ops: Vec<Op>,
    /// The deduplicated constant pool, indexed by instruction operands.
    pub constants: Vec<Constant>,
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool a constant, returning its index.
    ///
    /// Scans the pool for a structurally equal entry and reuses it;
    /// chunk constants always append.
    pub fn add_constant(&mut self, value: Constant) -> ConstIdx {
        if !matches!(value, Constant::Chunk(_)) {
            if let Some(idx) = self.constants.iter().position(|c| *c == value) {
                return idx as ConstIdx;
            }
        }
        let idx = self.constants.len() as ConstIdx;
        self.constants.push(value);
        idx
    }

    /// Emit an instruction.
    pub fn emit(&mut self, op: Op) {
        self.ops.push(op);
    }
}
