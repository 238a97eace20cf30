//! Session context.
//!
//! A [`Session`] lives for exactly one command invocation. It owns the
//! dependency metadata and caches the graph walk, so every extension point
//! resolved during the invocation sees the same package order. Nothing is
//! cached across sessions.

use std::cell::OnceCell;

use crate::error::GraphError;
use crate::extension::{Candidate, ExtensionModule, ExtensionPoint};
use crate::graph;
use crate::locator;
use crate::resolver::resolve_leaves;
use crate::types::{Package, PackageIndex, PackageName};

/// Name of the engine's own base package.
pub const BASE_PACKAGE: &str = "rigger";

#[derive(Debug)]
pub struct Session {
    index: PackageIndex,
    base: PackageName,
    walk: OnceCell<Vec<Package>>,
}

impl Session {
    pub fn new(index: PackageIndex) -> Self {
        Self::with_base(index, PackageName::from(BASE_PACKAGE))
    }

    /// Session whose extension points are rooted in `base` rather than `rigger`.
    pub fn with_base(index: PackageIndex, base: PackageName) -> Self {
        Self {
            index,
            base,
            walk: OnceCell::new(),
        }
    }

    pub fn index(&self) -> &PackageIndex {
        &self.index
    }

    pub fn base(&self) -> &PackageName {
        &self.base
    }

    pub fn root(&self) -> &PackageName {
        &self.index.root
    }

    pub fn root_package(&self) -> Result<&Package, GraphError> {
        self.index
            .root_package()
            .ok_or_else(|| GraphError::UnknownPackage(self.index.root.clone()))
    }

    /// Walked packages, base first and root last. Computed once per session.
    pub fn packages(&self) -> Result<&[Package], GraphError> {
        if let Some(order) = self.walk.get() {
            return Ok(order);
        }
        let order = graph::walk(&self.index, &self.index.root, &self.base)?;
        Ok(self.walk.get_or_init(|| order))
    }

    /// Every walked package's module for `point`, in walk order.
    ///
    /// Packages with malformed metadata are skipped with a warning.
    pub fn modules<'p, T: ?Sized>(
        &self,
        point: &'p ExtensionPoint<T>,
    ) -> Result<Vec<&'p ExtensionModule<T>>, GraphError> {
        let mut modules = Vec::new();
        for package in self.packages()? {
            match locator::locate(package, point) {
                Ok(Some(module)) => modules.push(module),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(package = %package.name, error = %err, "skipping package");
                }
            }
        }
        Ok(modules)
    }

    /// Leaf candidates for `point` in deterministic order.
    pub fn resolve<'p, T: ?Sized>(
        &self,
        point: &'p ExtensionPoint<T>,
    ) -> Result<Vec<&'p Candidate<T>>, GraphError> {
        let modules = self.modules(point)?;
        Ok(resolve_leaves(&modules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    trait Task {}
    struct Noop;
    impl Task for Noop {}
    fn noop() -> Box<dyn Task> {
        Box::new(Noop)
    }

    fn index() -> PackageIndex {
        let pkg = |name: &str, deps: &[&str]| Package {
            name: PackageName::from(name),
            root: PathBuf::from("/pkgs").join(name),
            dependencies: deps.iter().map(|d| PackageName::from(*d)).collect(),
            rust_version: None,
        };
        PackageIndex {
            root: "app".into(),
            packages: vec![pkg("app", &["plugin", "rigger"]), pkg("plugin", &["rigger"]), pkg("rigger", &[])],
        }
    }

    #[test]
    fn walk_is_cached_for_the_session() {
        let session = Session::new(index());
        let first = session.packages().unwrap().as_ptr();
        let second = session.packages().unwrap().as_ptr();
        assert_eq!(first, second);
    }

    #[test]
    fn resolve_orders_by_walk_then_declaration() {
        let mut point = ExtensionPoint::<dyn Task>::new("rigger::dev::tasks");
        point
            .module_for("app")
            .register(Candidate::concrete("app::dev::tasks::Deploy", noop));
        point
            .module_for("rigger")
            .register(Candidate::concrete("rigger::dev::tasks::Lint", noop))
            .register(Candidate::concrete("rigger::dev::tasks::Fmt", noop));
        point
            .module_for("plugin")
            .register(Candidate::concrete("plugin::dev::tasks::Lint", noop).replaces("rigger::dev::tasks::Lint"));

        let session = Session::new(index());
        let ids: Vec<_> = session
            .resolve(&point)
            .unwrap()
            .iter()
            .map(|c| c.id.0.clone())
            .collect();
        assert_eq!(
            ids,
            vec!["rigger::dev::tasks::Fmt", "plugin::dev::tasks::Lint", "app::dev::tasks::Deploy"]
        );
    }

    #[test]
    fn cycle_aborts_the_session() {
        let mut idx = index();
        idx.packages[2].dependencies.push("plugin".into());
        let session = Session::new(idx);
        assert!(matches!(session.packages(), Err(GraphError::Cycle { .. })));
    }
}
