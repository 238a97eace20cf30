//! Dependency graph walker.
//!
//! [`walk`] returns every package reachable from the root that is, or
//! transitively depends on, the engine's base package. The order is
//! topological, base-most first: a package never precedes one of its own
//! dependencies. Ties are broken by package name so the order is stable
//! across runs.
//!
//! A cycle anywhere in the root's dependency closure is an error, even
//! among packages that would not be selected.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, VecDeque};

use crate::error::GraphError;
use crate::types::{Package, PackageIndex, PackageName};

/// Directed graph with forward (`depends on`) and reverse (`depended on by`) edges.
#[derive(Debug, Default, Clone)]
pub struct DepGraph {
    edges: BTreeMap<PackageName, BTreeSet<PackageName>>,
    reverse: BTreeMap<PackageName, BTreeSet<PackageName>>,
}

impl DepGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: PackageName) {
        self.edges.entry(node.clone()).or_default();
        self.reverse.entry(node).or_default();
    }

    /// Edge `source → target` means "source depends on target".
    pub fn add_edge(&mut self, source: PackageName, target: PackageName) {
        self.add_node(source.clone());
        self.add_node(target.clone());
        self.edges.entry(source.clone()).or_default().insert(target.clone());
        self.reverse.entry(target).or_default().insert(source);
    }

    pub fn contains(&self, node: &PackageName) -> bool {
        self.edges.contains_key(node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &PackageName> {
        self.edges.keys()
    }

    /// Every node with a path to `target` (its transitive dependents), excluding `target`.
    pub fn ancestors(&self, target: &PackageName) -> BTreeSet<PackageName> {
        let mut visited = BTreeSet::new();
        let Some(direct) = self.reverse.get(target) else {
            return visited;
        };
        let mut queue: VecDeque<&PackageName> = direct.iter().collect();
        while let Some(node) = queue.pop_front() {
            if visited.insert(node.clone()) {
                if let Some(next) = self.reverse.get(node) {
                    queue.extend(next.iter().filter(|n| !visited.contains(*n)));
                }
            }
        }
        visited
    }

    /// Every node in dependency order, or the cycle that prevents one.
    pub fn topological_sort(&self) -> Result<Vec<PackageName>, GraphError> {
        let all: BTreeSet<PackageName> = self.nodes().cloned().collect();
        self.topological_sort_subgraph(&all)
    }

    /// Kahn's algorithm restricted to `nodes`; dependencies come first.
    ///
    /// Ready nodes are popped in name order, which makes the result
    /// reproducible for an unchanged graph.
    pub fn topological_sort_subgraph(
        &self,
        nodes: &BTreeSet<PackageName>,
    ) -> Result<Vec<PackageName>, GraphError> {
        let mut pending: BTreeMap<&PackageName, usize> = nodes
            .iter()
            .map(|n| {
                let deps = self
                    .edges
                    .get(n)
                    .map(|d| d.iter().filter(|d| nodes.contains(*d)).count())
                    .unwrap_or(0);
                (n, deps)
            })
            .collect();

        let mut ready: BinaryHeap<Reverse<&PackageName>> = pending
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(n, _)| Reverse(*n))
            .collect();

        let mut order = Vec::with_capacity(nodes.len());
        while let Some(Reverse(node)) = ready.pop() {
            order.push(node.clone());
            let Some(dependents) = self.reverse.get(node) else {
                continue;
            };
            for dependent in dependents.iter().filter(|d| nodes.contains(*d)) {
                if let Some(count) = pending.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push(Reverse(dependent));
                    }
                }
            }
        }

        if order.len() != nodes.len() {
            let sorted: BTreeSet<&PackageName> = order.iter().collect();
            let packages = nodes
                .iter()
                .filter(|n| !sorted.contains(n))
                .cloned()
                .collect();
            return Err(GraphError::Cycle { packages });
        }
        Ok(order)
    }
}

/// Build the graph of every package reachable from `root` through declared dependencies.
///
/// Fails with [`GraphError::MissingDependency`] when a declared dependency is
/// not present in the index.
pub fn reachable_graph(index: &PackageIndex, root: &PackageName) -> Result<DepGraph, GraphError> {
    if index.get(root).is_none() {
        return Err(GraphError::UnknownPackage(root.clone()));
    }

    let mut graph = DepGraph::new();
    graph.add_node(root.clone());
    let mut seen: BTreeSet<PackageName> = BTreeSet::from([root.clone()]);
    let mut stack = vec![root.clone()];

    while let Some(name) = stack.pop() {
        let package = index
            .get(&name)
            .ok_or_else(|| GraphError::UnknownPackage(name.clone()))?;
        for dep in &package.dependencies {
            if index.get(dep).is_none() {
                return Err(GraphError::MissingDependency {
                    package: name.clone(),
                    dependency: dep.clone(),
                });
            }
            graph.add_edge(name.clone(), dep.clone());
            if seen.insert(dep.clone()) {
                stack.push(dep.clone());
            }
        }
    }
    Ok(graph)
}

/// Every package from `root`'s dependency closure that is `base` or depends on it,
/// in topological order (base first, root last).
pub fn walk(
    index: &PackageIndex,
    root: &PackageName,
    base: &PackageName,
) -> Result<Vec<Package>, GraphError> {
    let graph = reachable_graph(index, root)?;
    graph.topological_sort()?;
    if !graph.contains(base) {
        return Err(GraphError::NotDependent {
            root: root.clone(),
            base: base.clone(),
        });
    }

    let mut selected = graph.ancestors(base);
    selected.insert(base.clone());

    let order = graph.topological_sort_subgraph(&selected)?;
    tracing::debug!(
        root = %root,
        packages = order.len(),
        "walked dependency graph"
    );

    order
        .into_iter()
        .map(|name| {
            index
                .get(&name)
                .cloned()
                .ok_or(GraphError::UnknownPackage(name))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
