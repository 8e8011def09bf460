use std::env;

use baitcheck_core::config::Config;
use baitcheck_model::get_default_classifier;
use baitcheck_pipeline::{error_json, PredictionPipeline, Report};
use baitcheck_store::SqliteGateway;

// Stdout carries exactly one JSON line; all failures, including a missing
// URL argument, are reported in-band and the process exits cleanly.
fn main() {
    let args: Vec<String> = env::args().collect();
    let Some(url) = args.get(1) else {
        eprintln!("Usage: {} <article-url>", args[0]);
        println!("{}", error_json("no article URL was provided"));
        return;
    };
    match run(url) {
        Ok(report) => match serde_json::to_string(&report) {
            Ok(line) => println!("{line}"),
            Err(e) => println!("{}", error_json(&e.to_string())),
        },
        Err(e) => println!("{}", error_json(&e.to_string())),
    }
}

fn run(url: &str) -> anyhow::Result<Report> {
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let store = SqliteGateway::open(&config.database_url()).await?;
        let result = async {
            let classifier = get_default_classifier()?;
            let pipeline = PredictionPipeline::new(classifier, store.clone());
            pipeline.predict_and_store(url).await
        }
        .await;
        // Connection teardown happens on every exit path
        store.close().await;
        result
    })
}
