//! Layer dependency graph and emission order.
//!
//! Modules live in an arena addressed by declaration index. Edges come from
//! both wiring fields: `input = p` adds `p -> module` and `output = c` adds
//! `module -> c`. The emission order is a breadth-first topological walk
//! from the single `Input` layer, so sibling branches come out in
//! declaration order and every layer follows the layers it depends on.
//! A layer applied to an input that is not connected is left out with it.

use crate::cli::UnreachablePolicy;
use crate::compiler::error::GraphError;
use crate::domain::models::Module;
use std::collections::{HashMap, VecDeque};

/// Result of ordering: emitted modules, plus names left out because they
/// are not connected to the input layer.
#[derive(Debug)]
pub struct Ordering<'a> {
    pub modules: Vec<&'a Module>,
    pub dropped: Vec<&'a str>,
}

impl Ordering<'_> {
    pub fn names(&self) -> Vec<String> {
        self.modules.iter().map(|m| m.name.clone()).collect()
    }

    pub fn dropped_names(&self) -> Vec<String> {
        self.dropped.iter().map(|n| n.to_string()).collect()
    }

    pub fn drops(&self, name: &str) -> bool {
        self.dropped.contains(&name)
    }
}

pub struct LayerGraph<'a> {
    modules: &'a [Module],
    index: HashMap<&'a str, usize>,
    /// Successor indices per module, ascending and deduplicated.
    successors: Vec<Vec<usize>>,
    /// Index of the layer each module is applied to.
    producers: Vec<Option<usize>>,
    root: usize,
}

impl<'a> LayerGraph<'a> {
    pub fn build(modules: &'a [Module]) -> Result<Self, GraphError> {
        let mut index = HashMap::with_capacity(modules.len());
        for (i, m) in modules.iter().enumerate() {
            if index.insert(m.name.as_str(), i).is_some() {
                return Err(GraphError::DuplicateName(m.name.clone()));
            }
        }

        let roots: Vec<usize> = (0..modules.len())
            .filter(|&i| modules[i].is_input())
            .collect();
        let root = match roots.as_slice() {
            [] => return Err(GraphError::MissingInput),
            [only] => *only,
            many => {
                return Err(GraphError::MultipleInputs(
                    many.iter().map(|&i| modules[i].name.clone()).collect(),
                ))
            }
        };

        let mut successors = vec![Vec::new(); modules.len()];
        let mut producers = vec![None; modules.len()];
        for (i, m) in modules.iter().enumerate() {
            if let Some(input) = &m.input {
                let producer = *index.get(input.as_str()).ok_or_else(|| {
                    GraphError::DanglingInput {
                        module: m.name.clone(),
                        input: input.clone(),
                    }
                })?;
                successors[producer].push(i);
                producers[i] = Some(producer);
            }
            if let Some(output) = &m.output {
                let consumer = *index.get(output.as_str()).ok_or_else(|| {
                    GraphError::DanglingOutput {
                        module: m.name.clone(),
                        output: output.clone(),
                    }
                })?;
                successors[i].push(consumer);
            }
        }
        for s in &mut successors {
            s.sort_unstable();
            s.dedup();
        }

        Ok(Self {
            modules,
            index,
            successors,
            producers,
            root,
        })
    }

    pub fn root(&self) -> &'a Module {
        &self.modules[self.root]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    fn walk(&self, blocked: &[bool]) -> Vec<bool> {
        let mut seen = vec![false; self.modules.len()];
        let mut queue = VecDeque::from([self.root]);
        seen[self.root] = true;
        while let Some(u) = queue.pop_front() {
            for &v in &self.successors[u] {
                if !seen[v] && !blocked[v] {
                    seen[v] = true;
                    queue.push_back(v);
                }
            }
        }
        seen
    }

    /// Modules connected to the root whose input layer is connected too.
    ///
    /// An `output` edge can reach a module whose own `input` is an island;
    /// such a module is applied to a name that is never defined, so it is
    /// blocked and the walk repeats without it.
    fn reachable(&self) -> Vec<bool> {
        let mut blocked = vec![false; self.modules.len()];
        loop {
            let seen = self.walk(&blocked);
            let orphaned: Vec<usize> = (0..self.modules.len())
                .filter(|&i| i != self.root && seen[i])
                .filter(|&i| self.producers[i].is_some_and(|p| !seen[p]))
                .collect();
            if orphaned.is_empty() {
                return seen;
            }
            for i in orphaned {
                blocked[i] = true;
            }
        }
    }

    pub fn order(&self, policy: UnreachablePolicy) -> Result<Ordering<'a>, GraphError> {
        let n = self.modules.len();
        let reachable = self.reachable();

        // Only producers reachable from the root can ever be emitted, so only
        // they count towards a module's pending dependencies.
        let mut pending = vec![0usize; n];
        for u in (0..n).filter(|&u| reachable[u]) {
            for &v in self.successors[u].iter().filter(|&&v| reachable[v]) {
                if v == self.root {
                    return Err(GraphError::Cycle(vec![self.modules[u].name.clone()]));
                }
                pending[v] += 1;
            }
        }

        let mut emitted = vec![false; n];
        let mut out = Vec::with_capacity(n);
        let mut queue = VecDeque::from([self.root]);
        while let Some(u) = queue.pop_front() {
            emitted[u] = true;
            out.push(&self.modules[u]);
            for &v in self.successors[u].iter().filter(|&&v| reachable[v]) {
                pending[v] -= 1;
                if pending[v] == 0 {
                    queue.push_back(v);
                }
            }
        }

        let stuck: Vec<String> = (0..n)
            .filter(|&i| reachable[i] && !emitted[i])
            .map(|i| self.modules[i].name.clone())
            .collect();
        if !stuck.is_empty() {
            return Err(GraphError::Cycle(stuck));
        }

        let dropped: Vec<&'a str> = (0..n)
            .filter(|&i| !reachable[i])
            .map(|i| self.modules[i].name.as_str())
            .collect();
        if !dropped.is_empty() {
            match policy {
                UnreachablePolicy::Drop => {
                    tracing::debug!(dropped = ?dropped, "dropping unreachable layers");
                }
                UnreachablePolicy::Warn => {
                    tracing::warn!(dropped = ?dropped, "layers not connected to the input were dropped");
                }
                UnreachablePolicy::Error => {
                    return Err(GraphError::Unreachable(
                        dropped.iter().map(|n| n.to_string()).collect(),
                    ));
                }
            }
        }

        Ok(Ordering {
            modules: out,
            dropped,
        })
    }
}
