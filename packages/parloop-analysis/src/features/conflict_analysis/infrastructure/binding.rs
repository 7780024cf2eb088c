//! Per-thread variable bindings

use crate::features::access_model::ConstantEnv;
use crate::features::smt::Term;
use rustc_hash::FxHashMap;

/// One of the two simulated iterations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadId {
    T0,
    T1,
}

impl ThreadId {
    pub fn index(&self) -> usize {
        match self {
            ThreadId::T0 => 0,
            ThreadId::T1 => 1,
        }
    }

    /// Solver-level name of `variable` in this thread (`i` → `i_0`)
    pub fn qualify(&self, variable: &str) -> String {
        format!("{}_{}", variable, self.index())
    }
}

/// Name → symbolic value in thread 0 and thread 1
///
/// Constants hold the same term in both slots. Loop variables hold one
/// solver variable per thread; a nested loop variable may be bound in only
/// one thread when the two sides of a query sit in different loops.
#[derive(Debug, Clone, Default)]
pub struct ThreadBinding {
    values: FxHashMap<String, [Option<Term>; 2]>,
}

impl ThreadBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binding with every constant visible to both threads
    pub fn with_constants(constants: &ConstantEnv) -> Self {
        let mut binding = Self::new();
        for (name, value) in constants.iter() {
            binding.bind_both(name, Term::constant(value));
        }
        binding
    }

    pub fn bind_both(&mut self, name: impl Into<String>, term: Term) {
        self.values
            .insert(name.into(), [Some(term.clone()), Some(term)]);
    }

    pub fn bind(&mut self, name: &str, thread: ThreadId, term: Term) {
        let slots = self
            .values
            .entry(name.to_string())
            .or_insert([None, None]);
        slots[thread.index()] = Some(term);
    }

    pub fn get(&self, name: &str, thread: ThreadId) -> Option<&Term> {
        self.values
            .get(name)
            .and_then(|slots| slots[thread.index()].as_ref())
    }
}
