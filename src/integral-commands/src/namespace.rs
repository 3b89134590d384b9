//! Statically declared command namespaces.

use std::fmt;
use std::sync::Arc;

use crate::command::Command;

/// Error type returned by definition constructors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type DefinitionFactory = Box<dyn Fn() -> Result<Arc<dyn Command>, BoxError> + Send + Sync>;

/// A named constructor for one command.
pub struct Definition {
    id: String,
    factory: DefinitionFactory,
}

impl Definition {
    /// Identifier used in diagnostics, e.g. `integral/calculate`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Run the constructor.
    pub fn construct(&self) -> Result<Arc<dyn Command>, BoxError> {
        (self.factory)()
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition").field("id", &self.id).finish()
    }
}

/// An entry of a namespace.
#[derive(Debug)]
pub enum Entry {
    /// A command definition.
    Definition(Definition),
    /// A nested namespace (a group, or a subgroup inside a group).
    Namespace(Namespace),
}

/// A named level of the command tree.
#[derive(Debug)]
pub struct Namespace {
    name: String,
    entries: Vec<Entry>,
}

impl Namespace {
    /// The unnamed root namespace.
    pub fn root() -> Self {
        Self::new("")
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Add a command definition.
    ///
    /// The diagnostic ID is the namespace path joined with `id`.
    pub fn command<C, F>(mut self, id: impl Into<String>, factory: F) -> Self
    where
        C: Command + 'static,
        F: Fn() -> Result<C, BoxError> + Send + Sync + 'static,
    {
        let id = id.into();
        let id = if self.name.is_empty() {
            id
        } else {
            format!("{}/{}", self.name, id)
        };
        self.entries.push(Entry::Definition(Definition {
            id,
            factory: Box::new(move || factory().map(|cmd| Arc::new(cmd) as Arc<dyn Command>)),
        }));
        self
    }

    /// Add a nested namespace.
    pub fn namespace(mut self, namespace: Namespace) -> Self {
        let namespace = namespace.prefixed(&self.name);
        self.entries.push(Entry::Namespace(namespace));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn prefixed(mut self, prefix: &str) -> Self {
        if prefix.is_empty() {
            return self;
        }
        for entry in &mut self.entries {
            match entry {
                Entry::Definition(def) => def.id = format!("{}/{}", prefix, def.id),
                Entry::Namespace(ns) => {
                    let nested = std::mem::replace(ns, Namespace::root());
                    *ns = nested.prefixed(prefix);
                }
            }
        }
        self
    }
}
