//! Host-runtime integration: the symbol space a loader loads into, and the
//! hook a host consults when a name cannot otherwise be found.

use std::path::Path;

use crate::error::Result;

/// The environment that evaluates included source files and answers whether
/// a type name is currently defined in it.
pub trait SourceHost {
    /// Process-wide symbol query: is a type with this name defined right now?
    fn is_defined(&self, name: &str) -> bool;

    /// Evaluates one source file in the host.
    fn include(&mut self, location: &Path) -> Result<()>;
}

/// Handle for a registered resolver, used to unregister it later.
pub type ResolverId = u64;

/// A resolver answers "given a name, is it found now".
pub type Resolver = Box<dyn FnMut(&str) -> bool + Send>;

/// Registration surface of a host module-loading mechanism.
///
/// Ordering relative to other registered resolvers is host-defined and out
/// of this crate's hands.
pub trait LoaderHook {
    fn register(&mut self, resolver: Resolver) -> ResolverId;

    /// Removes a previously registered resolver. Unregistering an id that is
    /// not (or no longer) registered is a no-op.
    fn unregister(&mut self, id: ResolverId);
}

/// In-process resolver registry: consults resolvers in registration order
/// and stops at the first that reports success.
#[derive(Default)]
pub struct AutoloadStack {
    resolvers: Vec<(ResolverId, Resolver)>,
    next_id: ResolverId,
}

impl AutoloadStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, name: &str) -> bool {
        self.resolvers.iter_mut().any(|(_, resolver)| resolver(name))
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl LoaderHook for AutoloadStack {
    fn register(&mut self, resolver: Resolver) -> ResolverId {
        let id = self.next_id;
        self.next_id += 1;
        self.resolvers.push((id, resolver));
        id
    }

    fn unregister(&mut self, id: ResolverId) {
        self.resolvers.retain(|(registered, _)| *registered != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consults_resolvers_in_registration_order() {
        let mut stack = AutoloadStack::new();
        stack.register(Box::new(|name| name == "First"));
        stack.register(Box::new(|name| name == "First" || name == "Second"));

        assert!(stack.resolve("First"));
        assert!(stack.resolve("Second"));
        assert!(!stack.resolve("Third"));
    }

    #[test]
    fn stops_at_first_success() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let mut stack = AutoloadStack::new();
        stack.register(Box::new(|_| true));

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_resolver = Arc::clone(&calls);
        stack.register(Box::new(move |_| {
            calls_in_resolver.fetch_add(1, Ordering::Relaxed);
            true
        }));

        assert!(stack.resolve("Anything"));
        assert_eq!(stack.len(), 2);
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn unregister_is_idempotent() {
        let mut stack = AutoloadStack::new();
        let id = stack.register(Box::new(|_| true));
        assert!(stack.resolve("X"));

        stack.unregister(id);
        assert!(!stack.resolve("X"));
        assert!(stack.is_empty());

        // Second removal of the same id is a no-op, not an error.
        stack.unregister(id);
        assert!(stack.is_empty());
    }
}
