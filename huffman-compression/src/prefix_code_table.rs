use std::collections::BTreeMap;

use bit_vec::BitVec;

use crate::{
    frequency::FrequencyTable,
    tree::{CodeTree, Node},
};

/// Symbol to code mapping, derived from one code tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable(BTreeMap<char, BitVec>);

impl CodeTable {
    /// Walks the tree depth first, appending `0` on every left turn and `1`
    /// on every right turn. A tree made of a single leaf has no turns to
    /// take, so its symbol gets the code `1`.
    pub fn derive(tree: Option<&CodeTree>) -> Self {
        let mut codes = BTreeMap::new();
        match tree.map(CodeTree::root) {
            None => {}
            Some(Node::Leaf { symbol, .. }) => {
                codes.insert(*symbol, BitVec::from_elem(1, true));
            }
            Some(root) => {
                let mut code = BitVec::new();
                generate_codes_inner(root, &mut code, &mut codes);
            }
        }
        Self(codes)
    }

    pub fn get(&self, symbol: char) -> Option<&BitVec> {
        self.0.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &BitVec)> {
        self.0.iter().map(|(&ch, code)| (ch, code))
    }

    /// Number of bits the encoder emits for an input with these frequencies,
    /// `None` if that does not fit in a `u64`.
    pub fn encoded_len(&self, frequencies: &FrequencyTable) -> Option<u64> {
        frequencies
            .iter()
            .filter_map(|(ch, count)| self.get(ch).map(|code| (code.len() as u64, count)))
            .try_fold(0_u64, |total, (code_len, count)| {
                total.checked_add(code_len.checked_mul(count)?)
            })
    }
}

fn generate_codes_inner(
    node: &Node,
    current_code: &mut BitVec,
    result: &mut BTreeMap<char, BitVec>,
) {
    match node {
        Node::Leaf { symbol, .. } => {
            result.insert(*symbol, current_code.clone());
        }
        Node::Internal { left, right, .. } => {
            current_code.push(false);
            generate_codes_inner(left, current_code, result);
            current_code.pop();

            current_code.push(true);
            generate_codes_inner(right, current_code, result);
            current_code.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use bit_vec::BitVec;
    use proptest::prelude::*;
    use rstest::rstest;

    use super::CodeTable;
    use crate::{frequency::FrequencyTable, tree::CodeTree};

    fn bits(code: &str) -> BitVec {
        code.chars().map(|ch| ch == '1').collect()
    }

    fn table_for(input: &str) -> CodeTable {
        let tree = CodeTree::build(&FrequencyTable::count(input.chars()));
        CodeTable::derive(tree.as_ref())
    }

    #[test]
    fn test_code_generation() {
        // char_mapping test data comes from
        // https://opendsa-server.cs.vt.edu/ODSA/Books/CS3/html/Huffman.html
        let char_mapping: [(char, u64); 8] = [
            ('C', 32),
            ('D', 42),
            ('E', 120),
            ('K', 7),
            ('L', 42),
            ('M', 24),
            ('U', 37),
            ('Z', 2),
        ];
        let frequencies = FrequencyTable::try_from(BTreeMap::from(char_mapping)).unwrap();

        let tree = CodeTree::build(&frequencies).unwrap();
        let codes = CodeTable::derive(Some(&tree));
        let expected_codes = [
            ('C', "1110"),
            ('D', "101"),
            ('E', "0"),
            ('K', "111101"),
            ('L', "110"),
            ('M', "11111"),
            ('U', "100"),
            ('Z', "111100"),
        ];

        for (ch, expected_code) in expected_codes {
            let code = codes.get(ch).unwrap();
            assert_eq!(code, &bits(expected_code))
        }
        assert_eq!(codes.encoded_len(&frequencies), Some(785));
    }

    #[test]
    fn test_no_tree_gives_empty_table() {
        assert!(CodeTable::derive(None).is_empty());
    }

    #[test]
    fn test_single_symbol_code_is_one() {
        let codes = table_for("zzzzz");

        assert_eq!(codes.len(), 1);
        assert_eq!(codes.get('z'), Some(&bits("1")));
    }

    #[test]
    fn test_most_frequent_symbol_has_shortest_code() {
        let codes = table_for("aaabbc");

        assert_eq!(codes.get('a'), Some(&bits("0")));
        assert_eq!(codes.get('c'), Some(&bits("10")));
        assert_eq!(codes.get('b'), Some(&bits("11")));
    }

    #[rstest]
    #[case("ab")]
    #[case("aaabbc")]
    #[case("hello world")]
    #[case(include_str!("../tests/lorem.txt"))]
    fn test_codes_are_prefix_free(#[case] input: &str) {
        assert_prefix_free(&table_for(input));
    }

    #[test]
    fn test_encoded_len_overflow() {
        let counts = BTreeMap::from([('a', u64::MAX - 1), ('b', 1)]);
        let frequencies = FrequencyTable::try_from(counts).unwrap();
        let codes = CodeTable::derive(CodeTree::build(&frequencies).as_ref());

        // every code is one bit long, so the length is the total
        assert_eq!(codes.encoded_len(&frequencies), Some(u64::MAX));

        let counts = BTreeMap::from([('a', u64::MAX - 2), ('b', 1), ('c', 1)]);
        let frequencies = FrequencyTable::try_from(counts).unwrap();
        let codes = CodeTable::derive(CodeTree::build(&frequencies).as_ref());

        assert_eq!(codes.encoded_len(&frequencies), None);
    }

    fn assert_prefix_free(codes: &CodeTable) {
        for (a, code_a) in codes.iter() {
            assert!(!code_a.is_empty());
            for (b, code_b) in codes.iter() {
                if a == b || code_a.len() > code_b.len() {
                    continue;
                }
                let is_prefix = code_a.iter().zip(code_b.iter()).all(|(x, y)| x == y);
                assert!(!is_prefix, "{a:?} is a prefix of {b:?}");
            }
        }
    }

    proptest! {
        #[test]
        fn prop_codes_are_prefix_free(input in any::<String>()) {
            prop_assume!(FrequencyTable::count(input.chars()).len() >= 2);

            assert_prefix_free(&table_for(&input));
        }
    }
}
