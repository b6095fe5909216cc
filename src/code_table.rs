//! Code table generation from a prefix tree
//!
//! Codes are collected with an iterative depth-first walk, so deeply skewed
//! trees never grow the call stack. Going left appends a `0` bit, going right
//! a `1` bit.

use std::fmt;

use crate::frequency::FrequencyTable;
use crate::tree::{Node, PrefixTree};

/// The bit string assigned to one symbol, first bit first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn starts_with(&self, prefix: &Code) -> bool {
        self.bits.starts_with(&prefix.bits)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol-to-code mapping for one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    pub fn from_tree(tree: &PrefixTree) -> Self {
        let mut codes = vec![None; 256];
        let Some(root) = tree.root() else {
            return Self { codes };
        };

        // a lone leaf still needs one bit per occurrence
        if let Node::Leaf { symbol, .. } = *tree.node(root) {
            codes[symbol as usize] = Some(Code::new(vec![false]));
            return Self { codes };
        }

        // one shared path; each stack entry records the path length of its
        // parent and the bit taken from there
        let mut path: Vec<bool> = Vec::new();
        let mut stack = vec![(root, 0usize, None)];
        while let Some((id, parent_len, bit)) = stack.pop() {
            path.truncate(parent_len);
            if let Some(bit) = bit {
                path.push(bit);
            }
            match *tree.node(id) {
                Node::Leaf { symbol, .. } => codes[symbol as usize] = Some(Code::new(path.clone())),
                Node::Internal { left, right, .. } => {
                    stack.push((right, path.len(), Some(true)));
                    stack.push((left, path.len(), Some(false)));
                }
            }
        }
        Self { codes }
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes[symbol as usize].as_ref()
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coded symbols in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(b, code)| code.as_ref().map(|c| (b as u8, c)))
    }

    pub fn max_code_len(&self) -> usize {
        self.iter().map(|(_, c)| c.len()).max().unwrap_or(0)
    }

    /// Exact number of payload bits needed to encode the counted input.
    pub fn payload_bits(&self, freq: &FrequencyTable) -> u64 {
        freq.iter()
            .map(|(symbol, count)| count * self.get(symbol).map_or(0, |c| c.len() as u64))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_for(data: &[u8]) -> (FrequencyTable, CodeTable) {
        let freq = FrequencyTable::from_bytes(data);
        let table = CodeTable::from_tree(&PrefixTree::build(&freq));
        (freq, table)
    }

    #[test]
    fn test_empty_tree() {
        let (_, table) = table_for(b"");
        assert!(table.is_empty());
        assert_eq!(table.max_code_len(), 0);
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let (freq, table) = table_for(&[0x41; 1000]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0x41).unwrap().to_string(), "0");
        assert_eq!(table.payload_bits(&freq), 1000);
    }

    #[test]
    fn test_code_lengths_follow_frequency() {
        let (freq, table) = table_for(b"aaaaaabbbbcc");
        let a = table.get(b'a').unwrap().len();
        let b = table.get(b'b').unwrap().len();
        let c = table.get(b'c').unwrap().len();
        assert!(a <= b && b <= c);
        assert_eq!(a, 1);
        assert_eq!(c, 2);
        assert_eq!(table.payload_bits(&freq), (6 * a + 4 * b + 2 * c) as u64);
    }

    #[test]
    fn test_codes_for_tie_break_example() {
        let (_, table) = table_for(b"abc");
        assert_eq!(table.get(b'c').unwrap().to_string(), "0");
        assert_eq!(table.get(b'a').unwrap().to_string(), "10");
        assert_eq!(table.get(b'b').unwrap().to_string(), "11");
    }

    #[test]
    fn test_prefix_free() {
        let data: Vec<u8> = (0..=255u8).flat_map(|b| vec![b; (b as usize % 7) + 1]).collect();
        let (_, table) = table_for(&data);
        assert_eq!(table.len(), 256);
        let codes: Vec<&Code> = table.iter().map(|(_, c)| c).collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!b.starts_with(a), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_codes_on_skewed_tree() {
        // fibonacci weights: every merge pairs the next symbol (left) with
        // the chain built so far (right)
        let mut data = Vec::new();
        let (mut a, mut b) = (1usize, 1usize);
        for symbol in 0..20u8 {
            data.extend(std::iter::repeat(symbol).take(a));
            (a, b) = (b, a + b);
        }
        let (_, table) = table_for(&data);
        assert_eq!(table.max_code_len(), 19);
        assert_eq!(table.get(19).unwrap().to_string(), "0");
        assert_eq!(table.get(18).unwrap().to_string(), "10");
        assert_eq!(table.get(1).unwrap().to_string(), "1".repeat(19));
        assert_eq!(table.get(0).unwrap().to_string(), format!("{}0", "1".repeat(18)));
        for symbol in 2..20u8 {
            assert_eq!(table.get(symbol).unwrap().len(), 20 - symbol as usize);
        }
    }

    #[test]
    fn test_absent_symbol_has_no_code() {
        let (_, table) = table_for(b"xyz");
        assert!(table.get(b'a').is_none());
    }
}
