use std::io::{self, BufRead, Read, Write};

use bit_vec::BitVec;
use log::warn;
use serde::{de, Deserialize, Serialize};

use crate::{
    bit_io::{BitReader, BitWriter},
    error::HuffmanError,
    frequency::FrequencyTable,
    prefix_code_table::CodeTable,
    tree::CodeTree,
};

/// First line of a compressed file. The code tree is rebuilt from the
/// frequencies, `bit_count` excludes the padding of the last byte.
#[derive(Debug, Serialize, Deserialize)]
struct Header {
    frequencies: FrequencyTable,
    bit_count: u64,
}

pub fn write_compressed<W: Write>(
    mut writer: W,
    frequencies: &FrequencyTable,
    bits: &BitVec,
) -> Result<W, HuffmanError> {
    let header = Header {
        frequencies: frequencies.clone(),
        bit_count: bits.len() as u64,
    };
    let header = serde_json::to_string(&header).map_err(HuffmanError::MalformedHeader)?;
    writeln!(writer, "{header}").map_err(HuffmanError::OutputUnwritable)?;

    let mut bit_writer = BitWriter::new(writer);
    bit_writer
        .write_bits(bits.iter())
        .map_err(HuffmanError::OutputUnwritable)?;
    bit_writer.close().map_err(HuffmanError::OutputUnwritable)
}

pub fn read_compressed<R: BufRead>(
    mut reader: R,
) -> Result<(FrequencyTable, BitVec), HuffmanError> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(HuffmanError::InputUnreadable)?;
    let header: Header =
        serde_json::from_str(line.trim_end()).map_err(HuffmanError::MalformedHeader)?;

    let codes = CodeTable::derive(CodeTree::build(&header.frequencies).as_ref());
    if codes.encoded_len(&header.frequencies) != Some(header.bit_count) {
        return Err(HuffmanError::BitCountMismatch {
            declared: header.bit_count,
        });
    }
    let bit_count = usize::try_from(header.bit_count).map_err(|_| {
        HuffmanError::MalformedHeader(de::Error::custom(format!(
            "bit count {} does not fit in memory",
            header.bit_count
        )))
    })?;

    let mut bit_reader = BitReader::new(reader, bit_count);
    let mut bits = BitVec::new();
    while bit_reader.has_next() {
        match bit_reader.read_bit() {
            Ok(bit) => bits.push(bit),
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(HuffmanError::TruncatedStream {
                    bits_consumed: bits.len(),
                })
            }
            Err(err) => return Err(HuffmanError::InputUnreadable(err)),
        }
    }

    let mut trailing = Vec::new();
    bit_reader
        .into_inner()
        .read_to_end(&mut trailing)
        .map_err(HuffmanError::InputUnreadable)?;
    if !trailing.is_empty() {
        warn!(
            "ignoring {} bytes after the end of the compressed stream",
            trailing.len()
        );
    }

    Ok((header.frequencies, bits))
}
