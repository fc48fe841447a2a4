//! Produces the cleaned corpus file: latin-alphabet restriction,
//! lowercasing, and stopword removal over every string in the store.
//! The search engine itself never cleans text; this runs upstream.

use std::collections::HashSet;
use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use lazy_static::lazy_static;
use regex::Regex;
use tracing_subscriber::{fmt, EnvFilter};

lazy_static! {
    static ref NON_ALPHA: Regex = Regex::new(r"[^a-zA-Z]").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","cannot","could",
            "did","do","does","doing","down","during",
            "each","few","for","from","further",
            "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","it","its","itself",
            "me","more","most","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","should","so","some","such",
            "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","very",
            "was","we","were","what","when","where","which","while","who","whom","why","with","would",
            "you","your","yours","yourself","yourselves",
            // Corpus-specific noise left behind by wikitext stripping.
            "around","many","thumb","also",
        ];
        words.iter().copied().collect()
    };
}

#[derive(Parser)]
#[command(name = "cleaner")]
#[command(about = "Clean the raw document store for indexing", long_about = None)]
struct Args {
    /// Raw store file
    #[arg(long, default_value = "./data/data.json")]
    input: String,
    /// Cleaned store file to write
    #[arg(long, default_value = "./data/data_cleaned.json")]
    output: String,
}

/// Keeps latin letters only (everything else becomes a space), lowercases,
/// and drops stopwords. Whitespace runs collapse to single spaces.
fn clean_text(text: &str) -> String {
    let alpha = NON_ALPHA.replace_all(text, " ").to_lowercase();
    alpha
        .split_whitespace()
        .filter(|word| !STOPWORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cleans every string in the JSON tree, leaving structure untouched.
fn clean_value(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.into_iter().map(|(k, v)| (k, clean_value(v))).collect(),
        ),
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(clean_value).collect())
        }
        serde_json::Value::String(s) => serde_json::Value::String(clean_text(&s)),
        other => other,
    }
}

/// Reads the raw store, cleans every string, and writes the cleaned store.
/// Returns the number of top-level entries processed.
fn clean_store(input: &str, output: &str) -> Result<usize> {
    let raw = fs::read_to_string(input).with_context(|| format!("reading {input}"))?;
    let data: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("parsing {input}"))?;

    let num_entries = data.as_object().map_or(0, |m| m.len());
    let cleaned = clean_value(data);

    fs::write(output, serde_json::to_string_pretty(&cleaned)?)
        .with_context(|| format!("writing {output}"))?;
    Ok(num_entries)
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let num_entries = clean_store(&args.input, &args.output)?;
    tracing::info!(num_entries, output = %args.output, "cleaned store written");
    Ok(())
}
