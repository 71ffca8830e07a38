use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use agri_qa_engine::config::QaConfig;
use agri_qa_engine::ingestion::{load_crop_csv, load_rain_csv};
use agri_qa_engine::storage::TabularStore;
use agri_qa_engine::QaEngine;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let json_output = args.iter().any(|a| a == "--json");
    args.retain(|a| a != "--json");
    let config = QaConfig::from_args(args);
    let crop = load_crop_csv(&config.crop_path)
        .with_context(|| format!("loading crop data from {}", config.crop_path.display()))?;
    let rain = load_rain_csv(&config.rain_path)
        .with_context(|| format!("loading rainfall data from {}", config.rain_path.display()))?;
    let store = TabularStore::new(crop, rain)?;

    let status = store.status();
    println!("Agri Q&A - Crop + Rainfall");
    println!("{}", "=".repeat(40));
    println!(
        "Crop rows: {} | Rain rows: {}",
        status.crop_rows, status.rain_rows
    );
    println!("Crop states: {}", status.crop_states.join(", "));
    println!("Rain states: {}", status.rain_states.join(", "));
    println!();
    println!("Examples:");
    println!("  Top 5 crops in Himachal Pradesh");
    println!("  Trend of wheat over last 5 years in Himachal Pradesh");
    println!("  Compare rainfall between Maharashtra and Karnataka");
    println!("  Trend of rainfall in Kerala for last 5 years");
    println!();

    let engine = QaEngine::new(store);
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            break;
        }
        match engine.ask(question) {
            Ok(answer) if json_output => {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            }
            Ok(answer) => {
                println!("{}", answer.narrative);
                if let Some(table) = answer.table {
                    if !table.is_empty() {
                        println!();
                        println!("{}", table.render());
                    }
                }
            }
            // a failed question never takes down the session
            Err(err) => eprintln!("error: {err}"),
        }
        println!();
    }
    Ok(())
}
