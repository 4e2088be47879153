//! Kahn's algorithm over dense indices.

use std::collections::VecDeque;

/// Outcome of a topological sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KahnOutcome {
  /// Indices in topological order.
  pub sorted: Vec<usize>,
  /// Indices that could not be ordered because they sit on or behind a cycle,
  /// in ascending index order.
  pub remaining: Vec<usize>,
}

/// Sort `count` vertices given `(from, to)` arcs.
///
/// The queue is seeded with zero in-degree vertices in index order and
/// successors are visited in arc order, so the result is deterministic.
pub(crate) fn kahn(count: usize, arcs: impl IntoIterator<Item = (usize, usize)>) -> KahnOutcome {
  let mut in_degree = vec![0usize; count];
  let mut successors: Vec<Vec<usize>> = vec![Vec::new(); count];

  for (from, to) in arcs {
    successors[from].push(to);
    in_degree[to] += 1;
  }

  let mut queue: VecDeque<usize> = (0..count).filter(|&i| in_degree[i] == 0).collect();
  let mut sorted = Vec::with_capacity(count);
  let mut placed = vec![false; count];

  while let Some(current) = queue.pop_front() {
    sorted.push(current);
    placed[current] = true;
    for &next in &successors[current] {
      in_degree[next] -= 1;
      if in_degree[next] == 0 {
        queue.push_back(next);
      }
    }
  }

  let remaining = (0..count).filter(|&i| !placed[i]).collect();
  KahnOutcome { sorted, remaining }
}
