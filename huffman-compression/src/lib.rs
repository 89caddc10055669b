//! Lossless text compression with static Huffman coding.
//!
//! The pipeline is count, build, derive, encode:
//!
//! ```
//! use huffman_compression::{decode, encode, CodeTable, CodeTree, FrequencyTable};
//!
//! let content = "aaabbc";
//! let frequencies = FrequencyTable::count(content.chars());
//! let tree = CodeTree::build(&frequencies);
//! let codes = CodeTable::derive(tree.as_ref());
//!
//! let bits = encode(&codes, content.chars())?;
//! assert_eq!(decode(tree.as_ref(), bits.iter())?, content);
//! # Ok::<(), huffman_compression::HuffmanError>(())
//! ```

pub mod bit_io;
pub mod config;
pub mod container;
pub mod driver;
pub mod encode_decode;
pub mod error;
pub mod frequency;
pub mod prefix_code_table;
pub mod tree;

pub use encode_decode::{compress, decode, decompress, encode, Compressed};
pub use error::HuffmanError;
pub use frequency::FrequencyTable;
pub use prefix_code_table::CodeTable;
pub use tree::{CodeTree, Node};
