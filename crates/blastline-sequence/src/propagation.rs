//! Cumulative chain timing.
//!
//! Reads delays as accumulating along the connection graph: a hole detonates
//! when the signal from an initiation hole arrives after the sum of the
//! delays along the fastest path. Initiation holes are those that are never
//! the `to` end of a connection. When every hole has an incoming connection
//! the first connection's `from` hole initiates.
//!
//! The rest of the engine keeps reading delays as absolute offsets; this
//! schedule is reported alongside for comparison.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap, HashSet};

use blastline_model::BlastConnection;

/// Earliest cumulative detonation time of every reachable hole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainSchedule {
    times: BTreeMap<String, u64>,
    leaves: Vec<String>,
}

impl ChainSchedule {
    /// Propagate delays from the initiation holes.
    pub fn build(connections: &[BlastConnection]) -> Self {
        if connections.is_empty() {
            return Self::default();
        }

        let mut outgoing: HashMap<&str, Vec<&BlastConnection>> = HashMap::new();
        for conn in connections {
            outgoing.entry(conn.from_hole_id.as_str()).or_default().push(conn);
        }
        let targets: HashSet<&str> = connections.iter().map(|c| c.to_hole_id.as_str()).collect();

        let mut seen = HashSet::new();
        let mut roots: Vec<&str> = connections
            .iter()
            .map(|c| c.from_hole_id.as_str())
            .filter(|id| !targets.contains(id) && seen.insert(*id))
            .collect();
        if roots.is_empty() {
            roots.push(connections[0].from_hole_id.as_str());
        }

        // Dijkstra: delays are non-negative, so the first pop is the earliest.
        let mut best: HashMap<&str, u64> = HashMap::new();
        let mut queue = BinaryHeap::new();
        for root in roots {
            best.insert(root, 0);
            queue.push(Reverse((0u64, root)));
        }

        while let Some(Reverse((time, hole))) = queue.pop() {
            if best.get(hole).is_some_and(|&b| time > b) {
                continue;
            }
            for conn in outgoing.get(hole).into_iter().flatten() {
                let arrival = time + u64::from(conn.delay);
                let to = conn.to_hole_id.as_str();
                if best.get(to).map_or(true, |&b| arrival < b) {
                    best.insert(to, arrival);
                    queue.push(Reverse((arrival, to)));
                }
            }
        }

        let leaves = best
            .keys()
            .filter(|id| !outgoing.contains_key(*id))
            .map(|id| id.to_string())
            .collect::<Vec<_>>();
        let times = best
            .into_iter()
            .map(|(id, t)| (id.to_string(), t))
            .collect();

        let mut schedule = Self { times, leaves };
        schedule.leaves.sort();
        schedule
    }

    /// Cumulative detonation time of a hole, if the signal reaches it.
    pub fn time_of(&self, hole_id: &str) -> Option<u64> {
        self.times.get(hole_id).copied()
    }

    /// Every reached hole with its time, ordered by hole id.
    pub fn times(&self) -> &BTreeMap<String, u64> {
        &self.times
    }

    /// Detonation times of holes with no outgoing connection, ascending.
    pub fn leaf_times(&self) -> Vec<u64> {
        let mut times: Vec<u64> = self
            .leaves
            .iter()
            .filter_map(|id| self.time_of(id))
            .collect();
        times.sort_unstable();
        times
    }

    /// Time of the last detonation.
    pub fn total_time(&self) -> u64 {
        self.times.values().copied().max().unwrap_or(0)
    }

    /// Mean gap between consecutive leaf detonations.
    pub fn average_gap(&self) -> f64 {
        let times = self.leaf_times();
        match (times.first(), times.last()) {
            (Some(&first), Some(&last)) if times.len() > 1 => {
                (last - first) as f64 / (times.len() - 1) as f64
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(id: &str, from: &str, to: &str, delay: u32) -> BlastConnection {
        BlastConnection::new(id, from, to, delay)
    }

    #[test]
    fn delays_accumulate_along_chain() {
        let conns = vec![
            conn("C1", "A", "B", 100),
            conn("C2", "B", "C", 200),
            conn("C3", "C", "D", 50),
        ];
        let schedule = ChainSchedule::build(&conns);

        assert_eq!(schedule.time_of("A"), Some(0));
        assert_eq!(schedule.time_of("B"), Some(100));
        assert_eq!(schedule.time_of("C"), Some(300));
        assert_eq!(schedule.time_of("D"), Some(350));
        assert_eq!(schedule.leaf_times(), vec![350]);
        assert_eq!(schedule.total_time(), 350);
    }

    #[test]
    fn fastest_path_wins() {
        let conns = vec![
            conn("C1", "A", "B", 500),
            conn("C2", "A", "C", 100),
            conn("C3", "C", "B", 100),
        ];
        let schedule = ChainSchedule::build(&conns);
        assert_eq!(schedule.time_of("B"), Some(200));
    }

    #[test]
    fn branches_give_gaps() {
        let conns = vec![
            conn("C1", "A", "B", 100),
            conn("C2", "A", "C", 300),
            conn("C3", "A", "D", 500),
        ];
        let schedule = ChainSchedule::build(&conns);
        assert_eq!(schedule.leaf_times(), vec![100, 300, 500]);
        assert_eq!(schedule.average_gap(), 200.0);
    }

    #[test]
    fn cycle_falls_back_to_first_connection() {
        let conns = vec![
            conn("C1", "A", "B", 100),
            conn("C2", "B", "C", 100),
            conn("C3", "C", "A", 100),
        ];
        let schedule = ChainSchedule::build(&conns);

        assert_eq!(schedule.time_of("A"), Some(0));
        assert_eq!(schedule.time_of("C"), Some(200));
        assert!(schedule.leaf_times().is_empty());
        assert_eq!(schedule.total_time(), 200);
        assert_eq!(schedule.average_gap(), 0.0);
    }

    #[test]
    fn empty_schedule() {
        let schedule = ChainSchedule::build(&[]);
        assert_eq!(schedule.total_time(), 0);
        assert!(schedule.times().is_empty());
    }
}
