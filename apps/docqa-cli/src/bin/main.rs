use std::env;
use std::path::PathBuf;

use docqa_core::config::Config;
use docqa_core::data_processor::DataProcessor;
use docqa_core::types::{AnswerOutcome, SearchOutcome};
use docqa_core::Error;
use docqa_service::{DocumentService, JsonFileStore};
use docqa_text::answer::NOT_INDEXED;
use tracing::info;

const USAGE: &str = "Usage: docqa <ingest|add|search|ask|info|clear> [args...]
  ingest <dir | file...>       replace the document set with a batch of files
  add <file...>                stage files and rebuild the index
  search \"<query>\" [--limit N]
  ask \"<question>\"
  info
  clear";

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    args.remove(0);
    if args.is_empty() { eprintln!("{USAGE}"); std::process::exit(1); }
    let cmd = args.remove(0);
    (cmd, args)
}

/// Splits `--limit N` out of the positional arguments.
fn take_limit(args: &mut Vec<String>) -> anyhow::Result<Option<usize>> {
    let Some(pos) = args.iter().position(|a| a == "--limit") else { return Ok(None) };
    args.remove(pos);
    if pos >= args.len() { anyhow::bail!("--limit needs a value"); }
    let value = args.remove(pos);
    Ok(Some(value.parse().map_err(|_| anyhow::anyhow!("invalid --limit value: {value}"))?))
}

fn round3(score: f64) -> f64 { (score * 1000.0).round() / 1000.0 }

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("docqa_service=info".parse()?)
                .add_directive("docqa_core=info".parse()?),
        )
        .init();

    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    let snapshot_path = settings.snapshot_path(&env::current_dir()?);
    info!(snapshot = %snapshot_path.display(), "starting");

    let (cmd, mut args) = parse_args();
    let loader = DataProcessor::with_extensions(&settings.ingest.allowed_extensions);
    let service = DocumentService::open(settings, Box::new(JsonFileStore::new(snapshot_path)));

    match cmd.as_str() {
        "ingest" => {
            let files = match args.as_slice() {
                [] => { eprintln!("Usage: docqa ingest <dir | file...>"); std::process::exit(1) }
                [dir] if PathBuf::from(dir).is_dir() => loader.process_directory(&PathBuf::from(dir))?,
                paths => loader.process_paths(&paths.iter().map(PathBuf::from).collect::<Vec<_>>())?,
            };
            match service.ingest(files) {
                Ok(report) => println!("{}", serde_json::to_string_pretty(&report)?),
                Err(Error::InsufficientDocuments { processed, required, errors }) => {
                    eprintln!("Solo {processed} archivo(s) válido(s); se requieren al menos {required}.");
                    for e in &errors { eprintln!("  - {e}"); }
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }
        "add" => {
            if args.is_empty() { eprintln!("Usage: docqa add <file...>"); std::process::exit(1); }
            let files = loader.process_paths(&args.iter().map(PathBuf::from).collect::<Vec<_>>())?;
            let mut failed = 0;
            for file in &files {
                match service.add_file(file) {
                    Ok(kept) => println!("{}: {} fragmento(s)", file.name, kept),
                    Err(e) => {
                        eprintln!("{}: {}", file.name, e);
                        failed += 1;
                    }
                }
            }
            if failed > 0 { eprintln!("Hubo errores en {failed} archivo(s)"); }
            match service.build_index() {
                Some(summary) => println!(
                    "Índice reconstruido: {} documento(s), {} fragmento(s), snapshot {:?}",
                    summary.documents, summary.chunks, summary.persistence
                ),
                None => println!("No hay fragmentos para indexar"),
            }
        }
        "search" => {
            let limit = take_limit(&mut args)?;
            let query = args.first().cloned().unwrap_or_else(|| {
                eprintln!("Usage: docqa search \"<query>\" [--limit N]"); std::process::exit(1)
            });
            let outcome = match limit {
                Some(k) => service.search_top_k(&query, k),
                None => service.search(&query),
            };
            match outcome {
                SearchOutcome::NotIndexed => { eprintln!("{NOT_INDEXED}"); return Err(Error::NotIndexed.into()); }
                SearchOutcome::NoMatch => println!("Sin resultados para: \"{query}\""),
                SearchOutcome::Hits(hits) => {
                    println!("{} resultado(s) para: \"{}\"", hits.len(), query);
                    for (i, hit) in hits.iter().enumerate() {
                        println!("\n  {}. score={}  documento={}", i + 1, round3(hit.relevance_score), hit.document_name);
                        println!("     {}", hit.text);
                    }
                }
            }
        }
        "ask" => {
            let question = args.first().cloned().unwrap_or_else(|| {
                eprintln!("Usage: docqa ask \"<question>\""); std::process::exit(1)
            });
            match service.answer_question(&question) {
                AnswerOutcome::NotIndexed => { eprintln!("{NOT_INDEXED}"); return Err(Error::NotIndexed.into()); }
                AnswerOutcome::NotFound(message) => println!("{message}"),
                AnswerOutcome::Answered(answer) => {
                    println!("{}", answer.text);
                    println!("\nFuentes:");
                    for c in &answer.citations { println!("  [{}] {}", c.document_name, c.text); }
                }
            }
        }
        "info" => println!("{}", serde_json::to_string_pretty(&service.info())?),
        "clear" => {
            service.clear_index();
            println!("Índice limpiado");
        }
        _ => { eprintln!("Unknown command: {}\n{}", cmd, USAGE); std::process::exit(1); }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_flag_is_removed_from_args() {
        let mut args = vec!["volcanes".to_string(), "--limit".to_string(), "3".to_string()];
        assert_eq!(take_limit(&mut args).unwrap(), Some(3));
        assert_eq!(args, vec!["volcanes"]);

        let mut missing = vec!["--limit".to_string()];
        assert!(take_limit(&mut missing).is_err());
        let mut none = vec!["q".to_string()];
        assert_eq!(take_limit(&mut none).unwrap(), None);
    }

    #[test]
    fn scores_round_to_three_decimals() {
        assert_eq!(round3(0.123_456), 0.123);
        assert_eq!(round3(1.0), 1.0);
    }
}
