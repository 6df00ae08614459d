//! The graph of named pipeline targets.
//!
//! A target is either a task (one packaging format, the runtime image, or
//! the clean) or a composite that only groups other targets. Edges point
//! from a target to what must run before it.

use crate::bundler::error::{Error, Result};
use crate::bundler::settings::Format;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// What running a target does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Runs the packaging tool for one format.
    Package(Format),
    /// Builds the pruned runtime image.
    RuntimeImage,
    /// Evicts every known output directory.
    Clean,
    /// Runs its dependencies and nothing else.
    Composite,
}

/// One named target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: TargetKind,
    /// Targets run before this one, in order.
    pub depends_on: &'static [&'static str],
    /// Dependencies that must succeed for this target to run at all.
    pub requires: &'static [&'static str],
}

impl Target {
    const fn task(name: &'static str, description: &'static str, kind: TargetKind) -> Self {
        Self {
            name,
            description,
            kind,
            depends_on: &[],
            requires: &[],
        }
    }

    const fn composite(
        name: &'static str,
        description: &'static str,
        depends_on: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            description,
            kind: TargetKind::Composite,
            depends_on,
            requires: &[],
        }
    }

    pub fn is_composite(&self) -> bool {
        self.kind == TargetKind::Composite
    }
}

/// The built-in targets.
pub const STANDARD_TARGETS: &[Target] = &[
    Target::task(
        "build-portable",
        "Portable application image (no installer)",
        TargetKind::Package(Format::AppImage),
    ),
    Target::task("build-exe", "EXE installer", TargetKind::Package(Format::Exe)),
    Target::task("build-msi", "MSI installer", TargetKind::Package(Format::Msi)),
    Target::task(
        "runtime-image",
        "Pruned runtime image for the runtime-embedded installer",
        TargetKind::RuntimeImage,
    ),
    Target {
        name: "build-with-runtime",
        description: "EXE installer with an embedded runtime image",
        kind: TargetKind::Package(Format::ExeWithRuntime),
        depends_on: &["runtime-image"],
        requires: &["runtime-image"],
    },
    Target::task(
        "build-safe",
        "EXE installer in a fresh timestamped directory (never evicts)",
        TargetKind::Package(Format::ExeTimestamped),
    ),
    Target::task(
        "build-debug",
        "Debug application image with minimal options",
        TargetKind::Package(Format::DebugAppImage),
    ),
    Target::task("clean-outputs", "Remove every known output directory", TargetKind::Clean),
    Target::composite(
        "build-all",
        "EXE installer, MSI installer and portable image",
        &["build-exe", "build-msi", "build-portable"],
    ),
    Target::composite(
        "build-all-safe",
        "Timestamped installer, portable image and debug image",
        &["build-safe", "build-portable", "build-debug"],
    ),
    Target::composite("build-distribution", "Alias for build-all", &["build-all"]),
    Target::composite(
        "clean-and-build-all",
        "clean-outputs, then build-all",
        &["clean-outputs", "build-all"],
    ),
];

/// Validated target graph.
#[derive(Debug)]
pub struct TargetGraph {
    targets: Vec<Target>,
    index: HashMap<&'static str, NodeIndex>,
    graph: DiGraph<&'static str, ()>,
}

impl TargetGraph {
    /// Graph of [`STANDARD_TARGETS`].
    pub fn standard() -> Result<Self> {
        Self::new(STANDARD_TARGETS.to_vec())
    }

    /// Builds and validates a graph.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownTarget`] for a dependency that is not declared,
    /// [`Error::CyclicTarget`] if dependencies form a cycle, and
    /// [`Error::Config`] for duplicate names or a required target that is
    /// not also a dependency.
    pub fn new(targets: Vec<Target>) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        for target in &targets {
            let node = graph.add_node(target.name);
            if index.insert(target.name, node).is_some() {
                return Err(Error::Config(format!("target `{}` declared twice", target.name)));
            }
        }

        for target in &targets {
            for dep in target.depends_on {
                let to = *index
                    .get(dep)
                    .ok_or_else(|| Error::UnknownTarget((*dep).to_string()))?;
                graph.add_edge(index[target.name], to, ());
            }
            if let Some(req) = target.requires.iter().find(|r| !target.depends_on.contains(*r)) {
                return Err(Error::Config(format!(
                    "target `{}` requires `{req}` without depending on it",
                    target.name
                )));
            }
        }

        toposort(&graph, None).map_err(|cycle| Error::CyclicTarget(graph[cycle.node_id()].to_string()))?;

        Ok(Self {
            targets,
            index,
            graph,
        })
    }

    /// Every target, in declaration order.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Looks up a target by name.
    pub fn get(&self, name: &str) -> Option<&Target> {
        self.index
            .get(name)
            .map(|node| self.graph[*node])
            .and_then(|name| self.targets.iter().find(|t| t.name == name))
    }

    /// Tasks to run for `requested`, dependencies first, each at most once.
    ///
    /// Composites contribute their dependencies but never appear themselves.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownTarget`] if any requested name is not declared;
    /// nothing is planned in that case.
    pub fn plan<I, S>(&self, requested: I) -> Result<Vec<&Target>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roots = Vec::new();
        for name in requested {
            let name = name.as_ref();
            roots.push(self.get(name).ok_or_else(|| Error::UnknownTarget(name.to_string()))?);
        }

        let mut visited = HashSet::new();
        let mut plan = Vec::new();
        for root in roots {
            self.visit(root, &mut visited, &mut plan);
        }
        Ok(plan)
    }

    fn visit<'a>(&'a self, target: &'a Target, visited: &mut HashSet<&'static str>, plan: &mut Vec<&'a Target>) {
        if !visited.insert(target.name) {
            return;
        }
        for dep in target.depends_on {
            // Dependencies were validated when the graph was built
            if let Some(dep) = self.get(dep) {
                self.visit(dep, visited, plan);
            }
        }
        if !target.is_composite() {
            plan.push(target);
        }
    }
}
