//! Compress a sample buffer, print its code table and statistics, then
//! restore it.
//!
//! Run with: cargo run --example roundtrip -- "some text to encode"

use anyhow::{ensure, Context, Result};
use sigma_huffman::{CodeTable, CompressionConfig, Compressor, FrequencyTable, PrefixTree};

fn main() -> Result<()> {
    let text = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "aaaaaabbbbcc".to_string());
    let data = text.as_bytes();

    let compressor = Compressor::new(CompressionConfig {
        verify_roundtrip: true,
        ..CompressionConfig::default()
    });
    let output = compressor
        .compress(data)
        .context("compressing sample input")?;

    let freq = FrequencyTable::from_bytes(data);
    let codes = CodeTable::from_tree(&PrefixTree::build(&freq));
    for (symbol, code) in codes.iter() {
        let label = format!("{:?}", symbol as char);
        println!("{:>8} x{:<6} {}", label, freq.count(symbol), code);
    }

    let meta = &output.metadata;
    println!(
        "{} -> {} bytes (ratio {:.3}), {} payload bits, tree {} bytes, entropy {:.3} bits/byte",
        output.original_size,
        output.compressed_size,
        output.ratio,
        meta.payload_bits,
        meta.tree_bytes,
        meta.entropy_bits,
    );

    let restored = compressor
        .decompress(&output)
        .context("decompressing sample output")?;
    ensure!(restored == data, "restored bytes differ from input");
    Ok(())
}
