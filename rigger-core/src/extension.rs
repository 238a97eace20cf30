//! Static extension registry.
//!
//! Every package that wants to take part in an extension point declares an
//! [`ExtensionModule`] at the conventional module path (the base package's
//! path with its own identifier substituted) and lists its candidate types in
//! declaration order. A candidate without a factory is abstract. A candidate
//! may name the candidate it supersedes through `replaces`, which is the only
//! override relation the resolver knows about.
//!
//! ```rust
//! use rigger_core::extension::{Candidate, ExtensionPoint};
//!
//! trait Greeter { fn hello(&self) -> String; }
//! struct Plain;
//! impl Greeter for Plain { fn hello(&self) -> String { "hi".into() } }
//!
//! let mut point = ExtensionPoint::<dyn Greeter>::new("rigger::dev::greeters");
//! point
//!     .module_for("my-app")
//!     .register(Candidate::concrete("my_app::dev::greeters::Plain", || -> Box<dyn Greeter> {
//!         Box::new(Plain)
//!     }));
//! assert_eq!(point.modules().count(), 1);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::types::{CandidateId, ModulePath, PackageName};

/// Constructor for a concrete candidate.
pub type Factory<T> = fn() -> Box<T>;

/// One registered implementation (or abstract placeholder) of `T`.
pub struct Candidate<T: ?Sized> {
    pub id: CandidateId,
    pub replaces: Option<CandidateId>,
    factory: Option<Factory<T>>,
}

impl<T: ?Sized> Candidate<T> {
    pub fn concrete(id: impl Into<CandidateId>, factory: Factory<T>) -> Self {
        Self {
            id: id.into(),
            replaces: None,
            factory: Some(factory),
        }
    }

    /// A candidate that cannot be instantiated; it only anchors override chains.
    pub fn abstract_type(id: impl Into<CandidateId>) -> Self {
        Self {
            id: id.into(),
            replaces: None,
            factory: None,
        }
    }

    /// Declare the candidate this one supersedes.
    pub fn replaces(mut self, id: impl Into<CandidateId>) -> Self {
        self.replaces = Some(id.into());
        self
    }

    pub fn is_abstract(&self) -> bool {
        self.factory.is_none()
    }

    /// Build a fresh instance, or `None` for abstract candidates.
    pub fn instantiate(&self) -> Option<Box<T>> {
        self.factory.map(|f| f())
    }
}

impl<T: ?Sized> fmt::Debug for Candidate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("id", &self.id)
            .field("replaces", &self.replaces)
            .field("abstract", &self.is_abstract())
            .finish()
    }
}

/// Candidates declared by one package at one module path, in declaration order.
pub struct ExtensionModule<T: ?Sized> {
    pub path: ModulePath,
    candidates: Vec<Candidate<T>>,
}

impl<T: ?Sized> ExtensionModule<T> {
    pub fn new(path: impl Into<ModulePath>) -> Self {
        Self {
            path: path.into(),
            candidates: Vec::new(),
        }
    }

    pub fn register(&mut self, candidate: Candidate<T>) -> &mut Self {
        self.candidates.push(candidate);
        self
    }

    pub fn candidates(&self) -> &[Candidate<T>] {
        &self.candidates
    }
}

impl<T: ?Sized> fmt::Debug for ExtensionModule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionModule")
            .field("path", &self.path)
            .field("candidates", &self.candidates)
            .finish()
    }
}

/// A module slot defined by the base package plus every registered module for it.
pub struct ExtensionPoint<T: ?Sized> {
    path: ModulePath,
    modules: BTreeMap<ModulePath, ExtensionModule<T>>,
}

impl<T: ?Sized> ExtensionPoint<T> {
    /// `path` is the canonical module path inside the base package.
    pub fn new(path: impl Into<ModulePath>) -> Self {
        Self {
            path: path.into(),
            modules: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &ModulePath {
        &self.path
    }

    /// Name of the package that defines this extension point.
    pub fn base(&self) -> PackageName {
        PackageName::from(self.path.top_level())
    }

    /// The module `package` declares for this point, created empty on first use.
    pub fn module_for(&mut self, package: &str) -> &mut ExtensionModule<T> {
        let path = self
            .path
            .with_top_level(&PackageName::from(package).ident());
        self.modules
            .entry(path.clone())
            .or_insert_with(|| ExtensionModule::new(path))
    }

    pub fn get(&self, path: &ModulePath) -> Option<&ExtensionModule<T>> {
        self.modules.get(path)
    }

    pub fn modules(&self) -> impl Iterator<Item = &ExtensionModule<T>> {
        self.modules.values()
    }
}

impl<T: ?Sized> fmt::Debug for ExtensionPoint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionPoint")
            .field("path", &self.path)
            .field("modules", &self.modules.keys().collect::<Vec<_>>())
            .finish()
    }
}
