use bit_vec::BitVec;

use crate::{
    error::HuffmanError,
    frequency::FrequencyTable,
    prefix_code_table::CodeTable,
    tree::{CodeTree, Node},
};

/// Everything produced while compressing one input.
#[derive(Debug, Clone)]
pub struct Compressed {
    pub frequencies: FrequencyTable,
    pub tree: Option<CodeTree>,
    pub codes: CodeTable,
    pub bits: BitVec,
}

pub fn compress(content: &str) -> Result<Compressed, HuffmanError> {
    let frequencies = FrequencyTable::count(content.chars());
    let tree = CodeTree::build(&frequencies);
    let codes = CodeTable::derive(tree.as_ref());
    let bits = encode(&codes, content.chars())?;

    Ok(Compressed {
        frequencies,
        tree,
        codes,
        bits,
    })
}

/// Rebuilds the code tree from stored frequencies and decodes `bits`. The
/// decoded text has to contain exactly the symbols the frequencies count.
pub fn decompress(frequencies: &FrequencyTable, bits: &BitVec) -> Result<String, HuffmanError> {
    let tree = CodeTree::build(frequencies);
    let content = decode(tree.as_ref(), bits.iter())?;

    if &FrequencyTable::count(content.chars()) != frequencies {
        return Err(HuffmanError::FrequencyMismatch);
    }
    Ok(content)
}

/// Concatenates the code of every symbol, in input order.
pub fn encode(
    codes: &CodeTable,
    symbols: impl IntoIterator<Item = char>,
) -> Result<BitVec, HuffmanError> {
    let mut bits = BitVec::new();
    for symbol in symbols {
        let code = codes
            .get(symbol)
            .ok_or(HuffmanError::UnknownSymbol { symbol })?;
        bits.extend(code.iter());
    }
    Ok(bits)
}

pub fn decode(
    tree: Option<&CodeTree>,
    bits: impl IntoIterator<Item = bool>,
) -> Result<String, HuffmanError> {
    let bits = bits.into_iter();

    let root = match tree {
        Some(tree) => tree.root(),
        None => {
            let bits_present = bits.count();
            if bits_present > 0 {
                return Err(HuffmanError::InconsistentEmptyState { bits_present });
            }
            return Ok(String::new());
        }
    };

    let mut decoded = String::new();
    let mut current = root;
    let mut bits_consumed = 0;

    for bit in bits {
        bits_consumed += 1;
        current = match current {
            Node::Leaf { symbol, .. } => {
                // lone leaf, every bit stands for its symbol
                decoded.push(*symbol);
                continue;
            }
            Node::Internal { left, right, .. } => {
                if bit {
                    right.as_ref()
                } else {
                    left.as_ref()
                }
            }
        };

        if let Node::Leaf { symbol, .. } = current {
            decoded.push(*symbol);
            current = root;
        }
    }

    if bits_consumed == 0 {
        return Err(HuffmanError::InconsistentEmptyState { bits_present: 0 });
    }
    if !std::ptr::eq(current, root) {
        return Err(HuffmanError::TruncatedStream { bits_consumed });
    }

    Ok(decoded)
}
