//! Ordered fallback resolution
//!
//! Several tracking outputs are defined as "the first of these estimates that
//! exists". [`FallbackChain`] evaluates a list of optional-producing
//! strategies lazily, in priority order, and reports which one answered.

use tracing::trace;

type Strategy<'a, T> = Box<dyn FnOnce() -> Option<T> + 'a>;

/// Prioritized list of optional estimates
pub struct FallbackChain<'a, T> {
    label: &'static str,
    strategies: Vec<(&'static str, Strategy<'a, T>)>,
}

impl<'a, T: std::fmt::Debug + 'a> FallbackChain<'a, T> {
    /// Start an empty chain; `label` names the quantity in trace output
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            strategies: Vec::new(),
        }
    }

    /// Append a lazily evaluated strategy
    pub fn then<F>(mut self, name: &'static str, strategy: F) -> Self
    where
        F: FnOnce() -> Option<T> + 'a,
    {
        self.strategies.push((name, Box::new(strategy)));
        self
    }

    /// Append an already computed estimate
    pub fn then_value(self, name: &'static str, value: Option<T>) -> Self {
        self.then(name, move || value)
    }

    /// First present value, or `None` if every strategy came up empty
    pub fn resolve(self) -> Option<T> {
        let label = self.label;
        for (name, strategy) in self.strategies {
            if let Some(value) = strategy() {
                trace!("{}: resolved by {} -> {:?}", label, name, value);
                return Some(value);
            }
        }
        trace!("{}: no strategy produced a value", label);
        None
    }

    /// First present value, or `default`
    pub fn resolve_or(self, default: T) -> T {
        self.resolve().unwrap_or(default)
    }
}
