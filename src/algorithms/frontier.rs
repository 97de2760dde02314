use crate::algorithms::node::SearchNode;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Entry {
    node: SearchNode,
    sequence: u64,
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior, earlier insertions win ties
        match other.node.heuristic_score.cmp(&self.node.heuristic_score) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            other => other,
        }
    }
}

/// Open set of the search, popped in ascending heuristic score.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Entry>,
    next_sequence: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: SearchNode) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Entry { node, sequence });
    }

    pub fn pop(&mut self) -> Option<SearchNode> {
        self.heap.pop().map(|entry| entry.node)
    }

    pub fn peek(&self) -> Option<&SearchNode> {
        self.heap.peek().map(|entry| &entry.node)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.next_sequence = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchNode> {
        self.heap.iter().map(|entry| &entry.node)
    }
}
