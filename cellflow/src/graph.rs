//! Dependency graph of named cells with ordered, memoized recomputation.
//!
//! # Edge Direction
//!
//! ```text
//! A → B  means  "B depends on A"
//! ```
//!
//! Setting a source cell recomputes everything reachable along outgoing edges,
//! in topological order with ties broken by registration order. Values
//! produced during a pass are staged and committed together: if any cell
//! fails, the pass is dropped and every cell keeps its previous value.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::time::{Duration, Instant};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info_span, warn};

use crate::errors::{GraphError, Result};
use crate::value::{Inputs, StoredValue};

type ComputeFn = Box<dyn Fn(&Inputs<'_>) -> Result<StoredValue> + Send>;

struct Cell {
    name: String,
    dependencies: Vec<String>,
    compute: ComputeFn,
    value: Option<StoredValue>,
    /// Pass that last committed a value for this cell.
    last_pass: Option<u64>,
    recompute_count: u64,
}

impl Cell {
    fn is_source(&self) -> bool {
        self.dependencies.is_empty()
    }
}

/// Point-in-time view of one cell, for display and assertions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellStatus {
    pub name: String,
    pub dependencies: Vec<String>,
    pub is_source: bool,
    pub type_name: Option<&'static str>,
    pub last_pass: Option<u64>,
    pub recompute_count: u64,
}

impl CellStatus {
    pub fn is_evaluated(&self) -> bool {
        self.type_name.is_some()
    }
}

/// Outcome of a committed propagation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PassReport {
    pub pass: u64,

    /// Source cell that was set, `None` for [`DependencyGraph::evaluate_all`].
    pub trigger: Option<String>,

    /// Cells whose values were committed, in evaluation order.
    pub recomputed: Vec<String>,

    pub duration: Duration,
}

impl PassReport {
    pub fn was_recomputed(&self, name: &str) -> bool {
        self.recomputed.iter().any(|cell| cell == name)
    }

    /// One-line summary for logs and status bars.
    ///
    /// Format: `pass 3 [sample_size] 4 cells in 0.21ms`
    pub fn summary(&self) -> String {
        format!(
            "pass {} [{}] {} cells in {:.2}ms",
            self.pass,
            self.trigger.as_deref().unwrap_or("all"),
            self.recomputed.len(),
            self.duration.as_secs_f64() * 1000.0,
        )
    }
}

/// A directed acyclic graph of cells and their cached values.
///
/// # Invariants
///
/// 1. **Acyclic:** registration rejects any cell that would close a cycle,
///    including cycles through forward references.
/// 2. **Sources always hold a value:** a cell without dependencies computes its
///    default at registration and only changes through `set_value`.
/// 3. **All-or-nothing passes:** no pass commits a subset of its cells.
#[derive(Default)]
pub struct DependencyGraph {
    cells: Vec<Cell>,
    index: HashMap<String, usize>,

    /// Dependency name -> cells that declare it. Keyed by name so that forward
    /// references resolve once the dependency is registered.
    dependents: HashMap<String, Vec<usize>>,

    /// Id of the last committed pass. Registration happens in pass 0.
    pass: u64,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cell computed from `dependencies`.
    ///
    /// Dependencies may name cells that are registered later. A cell with no
    /// dependencies is a source: `compute` runs once, now, to produce its
    /// default value.
    pub fn register_cell<T, F>(
        &mut self,
        name: impl Into<String>,
        dependencies: &[&str],
        compute: F,
    ) -> Result<()>
    where
        T: Serialize + 'static,
        F: Fn(&Inputs<'_>) -> Result<T> + Send + 'static,
    {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(GraphError::DuplicateName(name).into());
        }

        let mut deps: Vec<String> = Vec::with_capacity(dependencies.len());
        for dep in dependencies {
            if !deps.iter().any(|d| d == dep) {
                deps.push((*dep).to_string());
            }
        }

        if let Some(path) = self.find_cycle(&name, &deps) {
            return Err(GraphError::Cycle { cell: name, path }.into());
        }

        let key = name.clone();
        let boxed: ComputeFn = Box::new(move |inputs: &Inputs<'_>| {
            let value = compute(inputs)?;
            StoredValue::encode(&key, &value)
        });

        let mut cell = Cell {
            name,
            dependencies: deps,
            compute: boxed,
            value: None,
            last_pass: None,
            recompute_count: 0,
        };

        if cell.is_source() {
            let inputs = Inputs::new(&cell.name, Vec::new());
            let value = (cell.compute)(&inputs).map_err(|e| GraphError::ComputeFailed {
                cell: cell.name.clone(),
                source: Box::new(e),
            })?;
            cell.value = Some(value);
            cell.last_pass = Some(self.pass);
            cell.recompute_count = 1;
        }

        let idx = self.cells.len();
        for dep in &cell.dependencies {
            self.dependents.entry(dep.clone()).or_default().push(idx);
        }
        debug!(cell = %cell.name, dependencies = ?cell.dependencies, "registered cell");
        self.index.insert(cell.name.clone(), idx);
        self.cells.push(cell);

        Ok(())
    }

    /// Register a source cell holding `default` until it is set.
    pub fn register_input<T>(&mut self, name: impl Into<String>, default: T) -> Result<()>
    where
        T: Serialize + Clone + Send + 'static,
    {
        self.register_cell(name, &[], move |_| Ok(default.clone()))
    }

    /// Set a source cell and recompute everything downstream of it.
    pub fn set_value<T: Serialize>(&mut self, name: &str, value: &T) -> Result<PassReport> {
        let idx = self.lookup(name)?;
        if !self.cells[idx].is_source() {
            return Err(GraphError::NotASourceCell(name.to_string()).into());
        }

        let value = StoredValue::encode(name, value)?;
        let affected = self.downstream(idx);
        let order = self.topo_order(&affected)?;
        self.run_pass(Some((idx, value)), order)
    }

    /// Read a cell's cached value.
    pub fn get_value<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let cell = &self.cells[self.lookup(name)?];
        cell.value
            .as_ref()
            .ok_or_else(|| GraphError::NotYetEvaluated(name.to_string()))?
            .decode(name)
    }

    /// Recompute every derived cell once. Sources keep their current values.
    pub fn evaluate_all(&mut self) -> Result<PassReport> {
        let members: HashSet<usize> = (0..self.cells.len()).collect();
        let order = self
            .topo_order(&members)?
            .into_iter()
            .filter(|&idx| !self.cells[idx].is_source())
            .collect();
        self.run_pass(None, order)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn is_source(&self, name: &str) -> Result<bool> {
        Ok(self.cells[self.lookup(name)?].is_source())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell names in registration order.
    pub fn cell_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.cells.iter().map(|c| c.name.as_str())
    }

    pub fn dependencies(&self, name: &str) -> Result<&[String]> {
        Ok(&self.cells[self.lookup(name)?].dependencies)
    }

    /// Registered cells that declare `name` as a dependency.
    pub fn dependents(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.lookup(name)?;
        Ok(self
            .dependents_of(idx)
            .iter()
            .map(|&i| self.cells[i].name.as_str())
            .collect())
    }

    /// Every cell in evaluation order.
    pub fn topological_order(&self) -> Result<Vec<&str>> {
        let members: HashSet<usize> = (0..self.cells.len()).collect();
        Ok(self
            .topo_order(&members)?
            .into_iter()
            .map(|idx| self.cells[idx].name.as_str())
            .collect())
    }

    pub fn last_pass(&self, name: &str) -> Result<Option<u64>> {
        Ok(self.cells[self.lookup(name)?].last_pass)
    }

    pub fn recompute_count(&self, name: &str) -> Result<u64> {
        Ok(self.cells[self.lookup(name)?].recompute_count)
    }

    /// Id of the last committed pass.
    pub fn current_pass(&self) -> u64 {
        self.pass
    }

    pub fn status(&self, name: &str) -> Result<CellStatus> {
        Ok(self.status_at(self.lookup(name)?))
    }

    /// Status of every cell in registration order.
    pub fn statuses(&self) -> Vec<CellStatus> {
        (0..self.cells.len()).map(|idx| self.status_at(idx)).collect()
    }

    fn status_at(&self, idx: usize) -> CellStatus {
        let cell = &self.cells[idx];
        CellStatus {
            name: cell.name.clone(),
            dependencies: cell.dependencies.clone(),
            is_source: cell.is_source(),
            type_name: cell.value.as_ref().map(StoredValue::type_name),
            last_pass: cell.last_pass,
            recompute_count: cell.recompute_count,
        }
    }

    fn lookup(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::UnknownCell(name.to_string()).into())
    }

    fn dependents_of(&self, idx: usize) -> &[usize] {
        self.dependents
            .get(&self.cells[idx].name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the dependency path that would close a cycle if `name` were
    /// registered with `dependencies`, starting and ending at `name`.
    fn find_cycle<'a>(&'a self, name: &str, dependencies: &'a [String]) -> Option<Vec<String>> {
        let mut visited: HashSet<&'a str> = HashSet::new();
        for dep in dependencies {
            let mut path = vec![name.to_string()];
            if self.reaches(dep, name, &mut visited, &mut path) {
                return Some(path);
            }
        }
        None
    }

    /// Depth-first search along dependency edges from `from` looking for
    /// `target`. On success `path` holds the route taken.
    fn reaches<'a>(
        &'a self,
        from: &'a str,
        target: &str,
        visited: &mut HashSet<&'a str>,
        path: &mut Vec<String>,
    ) -> bool {
        path.push(from.to_string());
        if from == target {
            return true;
        }
        if visited.insert(from) {
            if let Some(&idx) = self.index.get(from) {
                for dep in &self.cells[idx].dependencies {
                    if self.reaches(dep, target, visited, path) {
                        return true;
                    }
                }
            }
        }
        path.pop();
        false
    }

    /// `start` and every cell transitively depending on it.
    fn downstream(&self, start: usize) -> HashSet<usize> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(idx) = queue.pop_front() {
            for &dependent in self.dependents_of(idx) {
                if seen.insert(dependent) {
                    queue.push_back(dependent);
                }
            }
        }
        seen
    }

    /// Kahn's algorithm over the subgraph induced by `members`. The ready set
    /// is ordered by registration index, which keeps the order stable.
    fn topo_order(&self, members: &HashSet<usize>) -> Result<Vec<usize>> {
        let mut in_degree: HashMap<usize, usize> = members
            .iter()
            .map(|&idx| {
                let degree = self.cells[idx]
                    .dependencies
                    .iter()
                    .filter_map(|dep| self.index.get(dep))
                    .filter(|dep_idx| members.contains(*dep_idx))
                    .count();
                (idx, degree)
            })
            .collect();

        let mut ready: BTreeSet<usize> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(idx, _)| *idx)
            .collect();

        let mut order = Vec::with_capacity(members.len());
        while let Some(idx) = ready.pop_first() {
            order.push(idx);
            for &dependent in self.dependents_of(idx) {
                if let Some(degree) = in_degree.get_mut(&dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }

        if order.len() != members.len() {
            // Registration keeps the graph acyclic, so this only fires if that
            // invariant was broken.
            let mut stuck: Vec<usize> = members
                .iter()
                .copied()
                .filter(|idx| !order.contains(idx))
                .collect();
            stuck.sort_unstable();
            let path: Vec<String> = stuck.iter().map(|&i| self.cells[i].name.clone()).collect();
            return Err(GraphError::Cycle {
                cell: path[0].clone(),
                path,
            }
            .into());
        }

        Ok(order)
    }

    fn compute_cell(
        &self,
        idx: usize,
        staged: &HashMap<usize, StoredValue>,
    ) -> Result<StoredValue> {
        let cell = &self.cells[idx];
        let mut values = Vec::with_capacity(cell.dependencies.len());
        for dep in &cell.dependencies {
            let dep_idx = *self
                .index
                .get(dep)
                .ok_or_else(|| GraphError::MissingDependency {
                    cell: cell.name.clone(),
                    dependency: dep.clone(),
                })?;
            let value = staged
                .get(&dep_idx)
                .or(self.cells[dep_idx].value.as_ref())
                .ok_or_else(|| GraphError::NotYetEvaluated(dep.clone()))?;
            values.push((dep.as_str(), value));
        }

        debug!(cell = %cell.name, "recomputing");
        let inputs = Inputs::new(&cell.name, values);
        (cell.compute)(&inputs).map_err(|e| {
            GraphError::ComputeFailed {
                cell: cell.name.clone(),
                source: Box::new(e),
            }
            .into()
        })
    }

    fn run_pass(
        &mut self,
        trigger: Option<(usize, StoredValue)>,
        order: Vec<usize>,
    ) -> Result<PassReport> {
        let pass = self.pass + 1;
        let trigger_name = trigger.as_ref().map(|(idx, _)| self.cells[*idx].name.clone());
        let span = info_span!("pass", pass, trigger = trigger_name.as_deref().unwrap_or("all"));
        let _guard = span.enter();
        let start = Instant::now();

        let mut staged: HashMap<usize, StoredValue> = HashMap::new();
        let mut recomputed: Vec<usize> = Vec::with_capacity(order.len());
        if let Some((idx, value)) = trigger {
            staged.insert(idx, value);
            recomputed.push(idx);
        }

        for idx in order {
            if staged.contains_key(&idx) {
                continue;
            }
            match self.compute_cell(idx, &staged) {
                Ok(value) => {
                    staged.insert(idx, value);
                    recomputed.push(idx);
                }
                Err(e) => {
                    warn!(
                        cell = %self.cells[idx].name,
                        error = %e,
                        "pass aborted, nothing committed"
                    );
                    return Err(e);
                }
            }
        }

        for &idx in &recomputed {
            let cell = &mut self.cells[idx];
            cell.value = staged.remove(&idx);
            cell.last_pass = Some(pass);
            cell.recompute_count += 1;
        }
        self.pass = pass;

        let report = PassReport {
            pass,
            trigger: trigger_name,
            recomputed: recomputed
                .iter()
                .map(|&idx| self.cells[idx].name.clone())
                .collect(),
            duration: start.elapsed(),
        };
        debug!(summary = %report.summary(), "pass committed");
        Ok(report)
    }
}

impl fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("cells", &self.cell_names().collect::<Vec<_>>())
            .field("pass", &self.pass)
            .finish()
    }
}
