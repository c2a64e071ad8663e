//! Unique identifier generation for DOM anchors.
//!
//! Blocks that need ids in the rendered output (plots, tabs, collapsibles) pull
//! them from an [`IdGenerator`] threaded through the render walk. A fresh
//! generator is created for each top-level render, so sequential ids restart at
//! zero for every document and two renders never interfere.

use std::sync::RwLock;

/// Prefix used by the sequential strategy.
pub const ID_PREFIX: &str = "bloqs_id_";

/// How identifiers are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdStrategy {
    /// `bloqs_id_0`, `bloqs_id_1`, ... Deterministic, suitable for regression output.
    #[default]
    Sequential,
    /// Random 32-character hex identifiers.
    Random,
}

impl IdStrategy {
    /// Starts a new, independent id sequence.
    pub fn generator(self) -> IdGenerator {
        IdGenerator {
            strategy: self,
            counter: 0,
        }
    }
}

/// An infinite iterator of unique string identifiers.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    strategy: IdStrategy,
    counter: u64,
}

impl IdGenerator {
    /// Returns the next identifier. Never exhausts.
    pub fn next_id(&mut self) -> String {
        match self.strategy {
            IdStrategy::Sequential => {
                let id = format!("{}{}", ID_PREFIX, self.counter);
                self.counter += 1;
                id
            }
            IdStrategy::Random => uuid::Uuid::new_v4().simple().to_string(),
        }
    }
}

impl Iterator for IdGenerator {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        Some(self.next_id())
    }
}

// Configured at startup; not meant to be flipped while a render is in flight.
static DEFAULT_STRATEGY: RwLock<IdStrategy> = RwLock::new(IdStrategy::Sequential);

/// Replaces the process-wide default strategy used by [`id_generator`].
pub fn set_id_strategy(strategy: IdStrategy) {
    match DEFAULT_STRATEGY.write() {
        Ok(mut guard) => *guard = strategy,
        Err(poisoned) => *poisoned.into_inner() = strategy,
    }
}

/// Returns the process-wide default strategy.
pub fn default_id_strategy() -> IdStrategy {
    match DEFAULT_STRATEGY.read() {
        Ok(guard) => *guard,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Starts a fresh generator using the process-wide default strategy.
pub fn id_generator() -> IdGenerator {
    default_id_strategy().generator()
}
