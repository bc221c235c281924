//! Dependency graph resolution.
//!
//! Builds the dependency relation among initiatives, finds dependency
//! cycles and produces the order in which the allocator processes
//! initiatives.
//!
//! # Algorithm
//! 1. Iterative DFS with three-state marking (unvisited, visiting, done).
//!    Reaching a *visiting* node closes a cycle: every node on the stack path
//!    back to it is a cycle member. Any node with a tainted dependency is
//!    tainted in turn, so transitive dependents are excluded too.
//! 2. Finished nodes form a post-order working order (dependencies first).
//! 3. The working order is stably ranked by `(priority, name)`.
//! 4. A topological pass over untainted nodes always emits the best-ranked
//!    node whose dependencies are already emitted. Independent nodes keep
//!    priority order; dependents land after what they depend on.
//! 5. Tainted nodes follow, in rank order.
//!
//! # Complexity
//! O((V + E) log V).
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::models::Initiative;

/// Why an initiative is excluded by a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleTaint {
    /// Lies on a dependency cycle; `cycle` indexes [`Resolution::cycles`].
    Member {
        /// Index of the detected cycle.
        cycle: usize,
    },
    /// Depends, directly or transitively, on a cycle.
    Dependent {
        /// Direct dependency through which the cycle is reached.
        via: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Dependency relation over a slice of initiatives, by index.
///
/// Dependencies on identifiers that are not in the slice are left out of the
/// graph; the allocator reports them as unsatisfied.
#[derive(Debug, Clone)]
pub struct DependencyGraph<'a> {
    initiatives: &'a [Initiative],
    deps: Vec<Vec<usize>>,
}

/// Output of [`DependencyGraph::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Every initiative index exactly once, in processing order.
    pub order: Vec<usize>,
    /// Detected cycles as identifier paths, first node repeated at the end.
    pub cycles: Vec<Vec<String>>,
    taint: Vec<Option<CycleTaint>>,
}

impl Resolution {
    /// Cycle taint of the initiative at `index`, if any.
    pub fn taint(&self, index: usize) -> Option<&CycleTaint> {
        self.taint.get(index).and_then(Option::as_ref)
    }

    /// Whether the initiative at `index` is a cycle member or dependent.
    pub fn is_cyclic(&self, index: usize) -> bool {
        self.taint(index).is_some()
    }

    /// Number of tainted initiatives.
    pub fn cyclic_count(&self) -> usize {
        self.taint.iter().filter(|t| t.is_some()).count()
    }

    /// Rendered path of cycle `cycle`, e.g. `"C -> D -> C"`.
    pub fn cycle_path(&self, cycle: usize) -> String {
        self.cycles
            .get(cycle)
            .map(|path| path.join(" -> "))
            .unwrap_or_default()
    }
}

impl<'a> DependencyGraph<'a> {
    /// Builds the graph. When IDs repeat, dependencies bind to the first
    /// initiative carrying the ID.
    pub fn build(initiatives: &'a [Initiative]) -> Self {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(initiatives.len());
        for (i, initiative) in initiatives.iter().enumerate() {
            index.entry(initiative.id.as_str()).or_insert(i);
        }

        let deps = initiatives
            .iter()
            .map(|initiative| {
                let mut known: Vec<usize> = Vec::with_capacity(initiative.dependency_ids.len());
                for dep_id in &initiative.dependency_ids {
                    if let Some(&d) = index.get(dep_id.as_str()) {
                        if !known.contains(&d) {
                            known.push(d);
                        }
                    }
                }
                known
            })
            .collect();

        Self { initiatives, deps }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.initiatives.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.initiatives.is_empty()
    }

    /// Known direct dependencies of the node at `index`.
    pub fn dependencies(&self, index: usize) -> &[usize] {
        self.deps.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Detects cycles and computes the processing order.
    pub fn resolve(&self) -> Resolution {
        let (post_order, taint, cycles) = self.traverse();
        let rank = self.rank(&post_order);
        let mut order = self.ordered_acyclic(&rank, &taint);

        let mut tainted: Vec<usize> = (0..self.len()).filter(|&i| taint[i].is_some()).collect();
        tainted.sort_by_key(|&i| rank[i]);
        order.extend(tainted);

        Resolution {
            order,
            cycles,
            taint,
        }
    }

    fn id(&self, index: usize) -> String {
        self.initiatives[index].id.clone()
    }

    /// Iterative three-color DFS. Returns post-order, taint and cycles.
    #[allow(clippy::type_complexity)]
    fn traverse(&self) -> (Vec<usize>, Vec<Option<CycleTaint>>, Vec<Vec<String>>) {
        let n = self.len();
        let mut mark = vec![Mark::Unvisited; n];
        let mut taint: Vec<Option<CycleTaint>> = vec![None; n];
        let mut post_order = Vec::with_capacity(n);
        let mut cycles: Vec<Vec<String>> = Vec::new();

        for root in 0..n {
            if mark[root] != Mark::Unvisited {
                continue;
            }
            mark[root] = Mark::Visiting;
            // (node, next dependency position)
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

            while let Some(frame) = stack.last_mut() {
                let node = frame.0;
                if let Some(&dep) = self.deps[node].get(frame.1) {
                    frame.1 += 1;
                    match mark[dep] {
                        Mark::Unvisited => {
                            mark[dep] = Mark::Visiting;
                            stack.push((dep, 0));
                        }
                        Mark::Visiting => {
                            // Back edge: dep is on the stack.
                            if let Some(pos) = stack.iter().position(|&(s, _)| s == dep) {
                                let cycle = cycles.len();
                                let mut path: Vec<String> =
                                    stack[pos..].iter().map(|&(s, _)| self.id(s)).collect();
                                path.push(self.id(dep));
                                cycles.push(path);
                                for &(member, _) in &stack[pos..] {
                                    if !matches!(taint[member], Some(CycleTaint::Member { .. })) {
                                        taint[member] = Some(CycleTaint::Member { cycle });
                                    }
                                }
                            }
                        }
                        Mark::Done => {
                            if taint[dep].is_some() && taint[node].is_none() {
                                taint[node] = Some(CycleTaint::Dependent { via: self.id(dep) });
                            }
                        }
                    }
                } else {
                    stack.pop();
                    mark[node] = Mark::Done;
                    post_order.push(node);
                    if taint[node].is_some() {
                        if let Some(&(parent, _)) = stack.last() {
                            if taint[parent].is_none() {
                                taint[parent] = Some(CycleTaint::Dependent { via: self.id(node) });
                            }
                        }
                    }
                }
            }
        }

        (post_order, taint, cycles)
    }

    /// Rank of each node: position after a stable `(priority, name, id)` sort of
    /// the working order.
    fn rank(&self, post_order: &[usize]) -> Vec<usize> {
        let mut working = post_order.to_vec();
        working.sort_by(|&a, &b| {
            let (ia, ib) = (&self.initiatives[a], &self.initiatives[b]);
            ia.priority
                .cmp(&ib.priority)
                .then_with(|| ia.name.cmp(&ib.name))
                .then_with(|| ia.id.cmp(&ib.id))
        });

        let mut rank = vec![0; self.len()];
        for (position, &node) in working.iter().enumerate() {
            rank[node] = position;
        }
        rank
    }

    /// Topological order of untainted nodes, best rank first among ready ones.
    fn ordered_acyclic(&self, rank: &[usize], taint: &[Option<CycleTaint>]) -> Vec<usize> {
        let n = self.len();
        let mut pending = vec![0usize; n];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

        for node in (0..n).filter(|&i| taint[i].is_none()) {
            for &dep in &self.deps[node] {
                pending[node] += 1;
                dependents[dep].push(node);
            }
        }

        let mut ready: BinaryHeap<Reverse<(usize, usize)>> = (0..n)
            .filter(|&i| taint[i].is_none() && pending[i] == 0)
            .map(|i| Reverse((rank[i], i)))
            .collect();

        let mut order = Vec::with_capacity(n);
        while let Some(Reverse((_, node))) = ready.pop() {
            order.push(node);
            for &next in &dependents[node] {
                pending[next] -= 1;
                if pending[next] == 0 {
                    ready.push(Reverse((rank[next], next)));
                }
            }
        }
        order
    }
}
