use std::{cmp::Ordering, collections::BinaryHeap};

use log::{debug, trace};

use crate::frequency::FrequencyTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: char,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    // a FrequencyTable total fits in u64, so no partial sum can overflow
    fn merge(left: Node, right: Node) -> Node {
        Node::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

/// Huffman code tree. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree {
    root: Node,
}

impl CodeTree {
    /// Returns `None` for an empty table: there is nothing to encode.
    pub fn build(frequencies: &FrequencyTable) -> Option<Self> {
        let trees = Trees::from_iter(frequencies.iter());
        trees.merge().map(|root| CodeTree { root })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }
}

/// A tree waiting in the queue. `sequence` orders equal weights by
/// insertion so that rebuilding from the same table gives the same tree.
#[derive(Debug)]
struct Pending {
    sequence: usize,
    node: Node,
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed, BinaryHeap is a max-heap
        other
            .node
            .weight()
            .cmp(&self.node.weight())
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Pending {}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

struct Trees {
    queue: BinaryHeap<Pending>,
    next_sequence: usize,
}

impl FromIterator<(char, u64)> for Trees {
    fn from_iter<T: IntoIterator<Item = (char, u64)>>(iter: T) -> Self {
        let mut trees = Trees {
            queue: BinaryHeap::new(),
            next_sequence: 0,
        };
        for (symbol, weight) in iter {
            trees.insert(Node::Leaf { symbol, weight });
        }
        trees
    }
}

impl Trees {
    fn merge(mut self) -> Option<Node> {
        debug!("building code tree from {} leaves", self.queue.len());
        let mut merges = 0;
        loop {
            match self.pop_lowest()? {
                PopResult::TreesToMerge { left, right } => {
                    trace!(
                        "merging weights {} and {}",
                        left.weight(),
                        right.weight()
                    );
                    self.insert(Node::merge(left, right));
                    merges += 1;
                }
                PopResult::Single(root) => {
                    debug!("code tree complete after {merges} merges");
                    return Some(root);
                }
            }
        }
    }

    fn pop_lowest(&mut self) -> Option<PopResult> {
        let left = self.queue.pop()?.node;

        let result = match self.queue.pop() {
            Some(right) => PopResult::TreesToMerge {
                left,
                right: right.node,
            },
            None => PopResult::Single(left),
        };

        Some(result)
    }

    fn insert(&mut self, node: Node) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queue.push(Pending { sequence, node });
    }
}

enum PopResult {
    TreesToMerge { left: Node, right: Node },
    Single(Node),
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;
    use rstest::rstest;

    use super::{CodeTree, Node};
    use crate::frequency::FrequencyTable;

    fn assert_weights_add_up(node: &Node) {
        if let Node::Internal {
            weight,
            left,
            right,
        } = node
        {
            assert_eq!(*weight, left.weight() + right.weight());
            assert_weights_add_up(left);
            assert_weights_add_up(right);
        }
    }

    #[test]
    fn test_merging() {
        // char_mapping test data comes from
        // https://opendsa-server.cs.vt.edu/ODSA/Books/CS3/html/Huffman.html
        let char_mapping: [(char, u64); 8] = [
            ('Z', 2),
            ('K', 7),
            ('M', 24),
            ('C', 32),
            ('U', 37),
            ('D', 42),
            ('L', 42),
            ('E', 120),
        ];
        let frequencies = FrequencyTable::try_from(BTreeMap::from(char_mapping)).unwrap();

        let tree = CodeTree::build(&frequencies).unwrap();
        assert_eq!(tree.weight(), 306);
        assert_eq!(tree.leaf_count(), 8);
        assert_weights_add_up(tree.root());
    }

    #[test]
    fn test_empty_table_has_no_tree() {
        assert_eq!(CodeTree::build(&FrequencyTable::default()), None);
    }

    #[test]
    fn test_single_symbol_is_a_lone_leaf() {
        let frequencies = FrequencyTable::count("xxxx".chars());
        let tree = CodeTree::build(&frequencies).unwrap();

        assert_eq!(
            tree.root(),
            &Node::Leaf {
                symbol: 'x',
                weight: 4
            }
        );
    }

    #[test]
    fn test_first_extracted_becomes_left_child() {
        let frequencies = FrequencyTable::count("aaabbc".chars());
        let tree = CodeTree::build(&frequencies).unwrap();

        // c(1) + b(2) ties with a(3); a was queued first so it is extracted first
        let expected = Node::Internal {
            weight: 6,
            left: Box::new(Node::Leaf {
                symbol: 'a',
                weight: 3,
            }),
            right: Box::new(Node::Internal {
                weight: 3,
                left: Box::new(Node::Leaf {
                    symbol: 'c',
                    weight: 1,
                }),
                right: Box::new(Node::Leaf {
                    symbol: 'b',
                    weight: 2,
                }),
            }),
        };
        assert_eq!(tree.root(), &expected);
    }

    #[rstest]
    #[case("ab")]
    #[case("aabbccdd")]
    #[case("the quick brown fox jumps over the lazy dog")]
    #[case(include_str!("../tests/lorem.txt"))]
    fn test_rebuilding_is_deterministic(#[case] input: &str) {
        let frequencies = FrequencyTable::count(input.chars());

        let first = CodeTree::build(&frequencies).unwrap();
        let second = CodeTree::build(&FrequencyTable::count(input.chars())).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.weight(), input.chars().count() as u64);
        assert_eq!(first.leaf_count(), frequencies.len());
        assert_weights_add_up(first.root());
    }

    #[test]
    fn test_largest_total_builds_without_overflow() {
        let counts = BTreeMap::from([('a', u64::MAX - 2), ('b', 1), ('c', 1)]);
        let frequencies = FrequencyTable::try_from(counts).unwrap();

        let tree = CodeTree::build(&frequencies).unwrap();

        assert_eq!(tree.weight(), u64::MAX);
        assert_weights_add_up(tree.root());
    }

    proptest! {
        #[test]
        fn prop_weights_add_up_to_input_length(input in any::<String>()) {
            let frequencies = FrequencyTable::count(input.chars());

            match CodeTree::build(&frequencies) {
                None => prop_assert!(input.is_empty()),
                Some(tree) => {
                    prop_assert_eq!(tree.weight(), input.chars().count() as u64);
                    prop_assert_eq!(tree.leaf_count(), frequencies.len());
                    assert_weights_add_up(tree.root());
                }
            }
        }
    }
}
