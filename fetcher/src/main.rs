//! Fetches the "Do" section of city pages from the Wikivoyage API and
//! merges them into the flat JSON document store.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};

const API_URL: &str = "https://en.wikivoyage.org/w/api.php";

const DEFAULT_CITIES: &[&str] = &[
    "Tokyo", "New York", "Paris", "London", "Shanghai", "Dubai", "Mumbai", "Istanbul",
    "Beijing", "Los Angeles", "Seoul", "Bangkok", "Moscow", "Cairo", "Buenos Aires",
    "Hong Kong", "Sydney", "Berlin", "Madrid", "Rome", "Singapore", "Toronto", "Chicago",
    "San Francisco", "Melbourne", "Cape Town", "Athens", "Barcelona", "Vienna", "Munich",
    "Copenhagen", "Dublin", "Oslo", "Lisbon", "Prague", "Helsinki", "Edinburgh", "Milan",
    "Budapest", "Reykjavik", "Marrakech", "Nairobi",
];

lazy_static! {
    static ref TEMPLATE: Regex = Regex::new(r"\{\{[^{}]*\}\}").expect("valid regex");
    static ref PIPED_LINK: Regex =
        Regex::new(r"\[\[[^\[\]|]*\|([^\[\]]*)\]\]").expect("valid regex");
    static ref PLAIN_LINK: Regex = Regex::new(r"\[\[([^\[\]]*)\]\]").expect("valid regex");
    static ref REF: Regex = Regex::new(r"(?s)<ref[^>]*>.*?</ref>").expect("valid regex");
    static ref TAG: Regex = Regex::new(r"<[^>]+>").expect("valid regex");
    static ref EMPHASIS: Regex = Regex::new(r"'{2,}").expect("valid regex");
    static ref BLANK_LINES: Regex = Regex::new(r"\n{3,}").expect("valid regex");
}

#[derive(Parser)]
#[command(name = "fetcher")]
#[command(about = "Fetch city activity sections from Wikivoyage", long_about = None)]
struct Args {
    /// Store file to merge into
    #[arg(long, default_value = "./data/data.json")]
    output: String,
    /// Comma-separated city names (defaults to the built-in list)
    #[arg(long)]
    cities: Option<String>,
    /// Name of the page section to fetch
    #[arg(long, default_value = "do")]
    section: String,
    /// Request timeout seconds
    #[arg(long, default_value_t = 12)]
    timeout_secs: u64,
    /// User-Agent string
    #[arg(long, default_value = "citysearch-fetcher/0.1 (+https://example.com)")]
    user_agent: String,
}

#[derive(Serialize, Deserialize)]
struct StoreEntry {
    #[serde(rename = "do")]
    activities: String,
}

#[derive(Deserialize)]
struct SectionsResponse {
    parse: Option<SectionsParse>,
}

#[derive(Deserialize)]
struct SectionsParse {
    sections: Vec<Section>,
}

#[derive(Deserialize)]
struct Section {
    line: String,
    index: String,
}

#[derive(Deserialize)]
struct WikitextResponse {
    parse: Option<WikitextParse>,
}

#[derive(Deserialize)]
struct WikitextParse {
    wikitext: Wikitext,
}

#[derive(Deserialize)]
struct Wikitext {
    #[serde(rename = "*")]
    content: String,
}

/// Finds the index of the named section on a city's page, or `None` if
/// the page or section does not exist.
async fn section_index(client: &Client, city: &str, section: &str) -> Result<Option<String>> {
    let resp: SectionsResponse = client
        .get(API_URL)
        .query(&[
            ("action", "parse"),
            ("page", city),
            ("format", "json"),
            ("prop", "sections"),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .with_context(|| format!("parsing sections response for {city}"))?;

    Ok(resp.parse.and_then(|p| {
        p.sections
            .into_iter()
            .find(|s| s.line.eq_ignore_ascii_case(section))
            .map(|s| s.index)
    }))
}

/// Fetches the wikitext of one section and strips the markup.
async fn section_text(client: &Client, city: &str, index: &str) -> Result<Option<String>> {
    let resp: WikitextResponse = client
        .get(API_URL)
        .query(&[
            ("action", "parse"),
            ("page", city),
            ("format", "json"),
            ("prop", "wikitext"),
            ("section", index),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
        .with_context(|| format!("parsing wikitext response for {city}"))?;

    Ok(resp.parse.map(|p| strip_wikitext(&p.wikitext.content)))
}

/// Best-effort plain text from wikitext: removes templates (inside-out for
/// nesting), unwraps link syntax, drops refs/tags/emphasis, and collapses
/// blank lines.
fn strip_wikitext(source: &str) -> String {
    let mut text = source.to_string();
    loop {
        let stripped = TEMPLATE.replace_all(&text, "").into_owned();
        if stripped == text {
            break;
        }
        text = stripped;
    }
    let text = REF.replace_all(&text, "");
    let text = PIPED_LINK.replace_all(&text, "$1");
    let text = PLAIN_LINK.replace_all(&text, "$1");
    let text = TAG.replace_all(&text, "");
    let text = EMPHASIS.replace_all(&text, "");
    BLANK_LINES.replace_all(&text, "\n\n").trim().to_string()
}

fn load_store(path: &str) -> Result<BTreeMap<String, StoreEntry>> {
    if !Path::new(path).exists() {
        return Ok(BTreeMap::new());
    }
    let raw = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let cities: Vec<String> = match &args.cities {
        Some(list) => list
            .split(',')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect(),
        None => DEFAULT_CITIES.iter().map(|c| c.to_string()).collect(),
    };

    let client = Client::builder()
        .user_agent(args.user_agent.clone())
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;

    if let Some(dir) = Path::new(&args.output).parent() {
        fs::create_dir_all(dir).ok();
    }
    let mut store = load_store(&args.output)?;
    tracing::info!(
        num_cities = cities.len(),
        existing = store.len(),
        output = %args.output,
        "fetching city sections"
    );

    let mut fetched = 0usize;
    for city in &cities {
        let index = match section_index(&client, city, &args.section).await {
            Ok(Some(index)) => index,
            Ok(None) => {
                tracing::warn!(city = %city, section = %args.section, "section not found, skipping");
                continue;
            }
            Err(err) => {
                tracing::warn!(city = %city, error = %err, "section lookup failed, skipping");
                continue;
            }
        };
        match section_text(&client, city, &index).await {
            Ok(Some(text)) if !text.is_empty() => {
                store.insert(city.clone(), StoreEntry { activities: text });
                fetched += 1;
                tracing::info!(city = %city, "section fetched");
            }
            Ok(_) => tracing::warn!(city = %city, "empty section content, skipping"),
            Err(err) => tracing::warn!(city = %city, error = %err, "fetch failed, skipping"),
        }
    }

    fs::write(&args.output, serde_json::to_string_pretty(&store)?)
        .with_context(|| format!("writing {}", args.output))?;
    tracing::info!(fetched, total = store.len(), "store written");
    Ok(())
}
