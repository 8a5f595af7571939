//! Dependency graph for scheduler tasks
//!
//! Uses petgraph for graph operations. Titles are resolved to node indices
//! once, when the graph is built; edges run from a task to each of its
//! dependencies. Both traversals (cycle detection and post-order
//! sequencing) keep an explicit stack, so deep dependency chains never grow
//! the call stack.

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{DfsPostOrder, VisitMap};

use super::task::TaskSpec;

/// A dependency graph over a borrowed slice of tasks
#[derive(Debug)]
pub struct TaskGraph<'a> {
    /// Tasks in input order
    nodes: &'a [TaskSpec],

    /// The underlying directed graph; node weights are input positions
    graph: DiGraph<usize, ()>,

    /// Map from title to node index (last occurrence wins)
    index: HashMap<&'a str, NodeIndex>,

    /// Titles that appear more than once in the input
    duplicates: Vec<&'a str>,
}

impl<'a> TaskGraph<'a> {
    /// Builds a graph from a slice of tasks
    ///
    /// Dependencies naming a title that is not in `tasks` are dropped.
    pub fn from_tasks(tasks: &'a [TaskSpec]) -> Self {
        let mut graph = DiGraph::with_capacity(tasks.len(), 0);
        let mut index = HashMap::with_capacity(tasks.len());
        let mut duplicates = Vec::new();

        // First pass: add all nodes
        for (i, task) in tasks.iter().enumerate() {
            let node = graph.add_node(i);
            let title = task.title.as_str();
            if index.insert(title, node).is_some() && !duplicates.contains(&title) {
                duplicates.push(title);
            }
        }

        // Second pass: add edges. DfsPostOrder visits the most recently
        // added edge last, so list order is also visit order.
        for (i, task) in tasks.iter().enumerate() {
            for dep in &task.dependencies {
                match index.get(dep.as_str()) {
                    Some(&target) => {
                        graph.add_edge(NodeIndex::new(i), target, ());
                    }
                    None => {
                        tracing::debug!(task = %task.title, dependency = %dep, "ignoring dangling dependency");
                    }
                }
            }
        }

        if !duplicates.is_empty() {
            tracing::warn!(titles = ?duplicates, "duplicate task titles; lookups resolve to the last occurrence");
        }

        Self {
            nodes: tasks,
            graph,
            index,
            duplicates,
        }
    }

    /// Returns the number of tasks in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the task at a node index
    pub fn task(&self, idx: usize) -> &'a TaskSpec {
        &self.nodes[idx]
    }

    /// Returns the node index a title resolves to
    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.index.get(title).map(|node| node.index())
    }

    /// Returns the resolved dependency indices of a node, in list order
    pub fn dependencies(&self, idx: usize) -> Vec<usize> {
        let mut deps: Vec<usize> = self
            .graph
            .neighbors(NodeIndex::new(idx))
            .map(|node| self.graph[node])
            .collect();
        // petgraph yields the most recently added edge first
        deps.reverse();
        deps
    }

    /// Returns titles that occur more than once in the input
    pub fn duplicate_titles(&self) -> &[&'a str] {
        &self.duplicates
    }

    /// Returns true if any directed cycle exists
    ///
    /// Every component is checked. A task depending on itself is a cycle.
    pub fn has_cycle(&self) -> bool {
        toposort(&self.graph, None).is_err()
    }

    /// Returns node indices in dependency order
    ///
    /// Roots are tried by ascending deadline (missing deadlines last, input
    /// order among equals); from each undiscovered root a post-order DFS
    /// emits dependencies before their dependents. The graph must be
    /// acyclic: on cyclic input the order is still a permutation but some
    /// edges are violated.
    pub fn sequence(&self) -> Vec<usize> {
        let mut roots: Vec<usize> = (0..self.nodes.len()).collect();
        roots.sort_by_cached_key(|&i| self.nodes[i].priority_key());

        let mut dfs = DfsPostOrder::empty(&self.graph);
        let mut order = Vec::with_capacity(self.nodes.len());

        for root in roots {
            let root = NodeIndex::new(root);
            if dfs.discovered.is_visited(&root) {
                continue;
            }

            dfs.move_to(root);
            while let Some(node) = dfs.next(&self.graph) {
                order.push(self.graph[node]);
            }
        }

        order
    }

    /// Returns tasks in dependency order
    pub fn ordered_tasks(&self) -> Vec<&'a TaskSpec> {
        self.sequence().into_iter().map(|i| self.task(i)).collect()
    }
}

/// Returns true if the dependencies among `tasks` contain a cycle
pub fn has_cycle(tasks: &[TaskSpec]) -> bool {
    TaskGraph::from_tasks(tasks).has_cycle()
}

/// Orders acyclic `tasks` so every dependency precedes its dependents
pub fn sequence(tasks: &[TaskSpec]) -> Vec<&TaskSpec> {
    TaskGraph::from_tasks(tasks).ordered_tasks()
}
