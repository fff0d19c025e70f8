//! CSV seed loader
//!
//! Extract / transform / load for one entity type:
//!
//! ```text
//! seed cities data/cities.csv
//! seed states data/states.csv
//! seed countries data/countries.csv
//! ```
//!
//! The first CSV row names the fields. Code columns are normalized during
//! transform so reruns can never mint case-variant duplicates, and records
//! go through the regular query services, so the per-entity duplicate
//! policy applies: cities and countries refresh in place, states report
//! duplicates as failures.

use std::path::Path;
use std::sync::Arc;

use gazetteer_api::ApiConfig;
use gazetteer_core::{City, Country, Document, State};
use gazetteer_storage::{
    from_document, CityService, CountryService, CreateOutcome, LmdbDocumentStore, StateService,
};

#[derive(Debug, Default)]
struct LoadSummary {
    created: u64,
    updated: u64,
    failed: u64,
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <cities|states|countries> <csv-file>", args[0]);
        std::process::exit(1);
    }
    let entity = args[1].as_str();
    let csv_path = &args[2];

    let rows = match extract(csv_path) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Failed to read {}: {}", csv_path, e);
            std::process::exit(1);
        }
    };
    let records = transform(rows);
    let total = records.len();

    let config = ApiConfig::from_env();
    let store = Arc::new(LmdbDocumentStore::new(
        &config.data_dir,
        config.store_map_size_mb,
    ));

    let summary = match entity {
        "cities" => load_cities(&CityService::new(store), records).await,
        "states" => load_states(&StateService::new(store), records).await,
        "countries" => load_countries(&CountryService::new(store), records).await,
        other => {
            eprintln!("Unknown entity type: {}", other);
            std::process::exit(1);
        }
    };

    println!("{}", "=".repeat(60));
    println!("Summary for {} ({} rows):", entity, total);
    println!("  Created: {}", summary.created);
    println!("  Updated: {}", summary.updated);
    println!("  Failed:  {}", summary.failed);
    println!("{}", "=".repeat(60));

    if summary.failed > 0 {
        std::process::exit(2);
    }
}

/// Read the CSV file into rows of fields.
fn extract(path: impl AsRef<Path>) -> std::io::Result<Vec<Vec<String>>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_csv_line)
        .collect())
}

/// Turn rows into field mappings using the header row, normalizing code
/// columns along the way.
fn transform(mut rows: Vec<Vec<String>>) -> Vec<Document> {
    if rows.is_empty() {
        return Vec::new();
    }
    let header = rows.remove(0);

    rows.into_iter()
        .map(|row| {
            let mut doc = Document::new();
            for (i, field) in header.iter().enumerate() {
                let value = row.get(i).map(|v| v.trim()).unwrap_or_default();
                let value = match field.as_str() {
                    "code" | "state_code" | "country_code" => value.to_uppercase(),
                    _ => value.to_string(),
                };
                doc.insert(field.clone(), serde_json::Value::String(value));
            }
            doc
        })
        .collect()
}

/// Split one CSV line, honoring double quotes and doubled-quote escapes.
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

async fn load_cities(
    svc: &CityService<LmdbDocumentStore>,
    records: Vec<Document>,
) -> LoadSummary {
    let mut summary = LoadSummary::default();
    for doc in records {
        match from_document::<City>(doc) {
            Ok(city) => {
                let label = city.name.clone();
                record_outcome(&mut summary, svc.create(city).await, &label);
            }
            Err(e) => {
                eprintln!("Skipping malformed city row: {}", e);
                summary.failed += 1;
            }
        }
    }
    summary
}

async fn load_states(
    svc: &StateService<LmdbDocumentStore>,
    records: Vec<Document>,
) -> LoadSummary {
    let mut summary = LoadSummary::default();
    for doc in records {
        match from_document::<State>(doc) {
            Ok(state) => {
                let label = state.name.clone();
                record_outcome(&mut summary, svc.create(state).await, &label);
            }
            Err(e) => {
                eprintln!("Skipping malformed state row: {}", e);
                summary.failed += 1;
            }
        }
    }
    summary
}

async fn load_countries(
    svc: &CountryService<LmdbDocumentStore>,
    records: Vec<Document>,
) -> LoadSummary {
    let mut summary = LoadSummary::default();
    for doc in records {
        match from_document::<Country>(doc) {
            Ok(country) => {
                let label = country.name.clone();
                record_outcome(&mut summary, svc.create(country).await, &label);
            }
            Err(e) => {
                eprintln!("Skipping malformed country row: {}", e);
                summary.failed += 1;
            }
        }
    }
    summary
}

fn record_outcome(
    summary: &mut LoadSummary,
    result: gazetteer_core::RefdataResult<CreateOutcome>,
    label: &str,
) {
    match result {
        Ok(CreateOutcome::Created(_)) => {
            println!("+ Created: {}", label);
            summary.created += 1;
        }
        Ok(CreateOutcome::Updated) => {
            println!("~ Updated: {}", label);
            summary.updated += 1;
        }
        Err(e) => {
            eprintln!("x Failed {}: {}", label, e);
            summary.failed += 1;
        }
    }
}
