use std::env;
use std::path::{Path, PathBuf};

use docqa_core::data_processor::{DataProcessor, PlainTextExtractor};
use docqa_core::traits::TextExtractor;
use docqa_text::{search, Bm25Params, Chunker, IndexBuilder};

// Chunk plain text files in memory and query them once.
// Usage:
//   cargo run -p docqa-text --example search -- "your query" [--dir ../dev_data/txt] [--limit 5]

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("Usage: cargo run -p docqa-text --example search -- <query> [--dir DIR] [--limit N]");
        std::process::exit(1);
    }
    let mut query = String::new();
    let mut data_dir: Option<PathBuf> = None;
    let mut limit: usize = 5;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--dir" => {
                if i + 1 >= args.len() { eprintln!("--dir requires a path"); std::process::exit(2); }
                data_dir = Some(PathBuf::from(&args[i + 1]));
                i += 2; continue;
            }
            "--limit" => {
                if i + 1 >= args.len() { eprintln!("--limit requires a number"); std::process::exit(2); }
                limit = args[i + 1].parse().unwrap_or(limit);
                i += 2; continue;
            }
            s if s.starts_with('-') => {
                eprintln!("Unknown flag: {}", s); std::process::exit(2);
            }
            s => {
                if query.is_empty() { query = s.to_string(); }
                i += 1; continue;
            }
        }
    }

    // Resolve data dir precedence: flag > TEXT_DATA_DIR > workspace-relative fallback
    let data_dir = data_dir
        .or_else(|| env::var("TEXT_DATA_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| {
            let base = Path::new(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2).unwrap_or(Path::new("."));
            base.join("dev_data/txt")
        });

    let mut builder = IndexBuilder::new(Chunker::default(), 20);
    for file in DataProcessor::new().process_directory(&data_dir)? {
        match PlainTextExtractor.extract(&file) {
            Ok(text) => { builder.add_document(&file.name, &text); }
            Err(e) => eprintln!("skipping {}: {}", file.name, e),
        }
    }
    let index = builder.build(Bm25Params::default());

    println!("Lexical search\n==============");
    println!("Data : {} ({} chunks)", data_dir.display(), index.chunks().len());
    println!("Query: {} (limit {})\n", query, limit);

    let outcome = search(&index, &query, limit, 0.25);
    for (i, h) in outcome.hits().iter().enumerate() {
        println!("{:>2}. score={:.3} doc={}\n    {}", i + 1, h.relevance_score, h.document_name, h.text);
    }
    Ok(())
}
