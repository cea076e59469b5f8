//! llmcost - attach per-call LLM cost attributes to telemetry records

use anyhow::Context;
use clap::Parser;
use llmcost::{
    cli::{Cli, Command},
    pipeline::{build_chain, enrich_stream, load_cost_enricher},
};
use serde_json::json;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean JSONL. --verbose overrides RUST_LOG.
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("llmcost=info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("llmcost=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.pricing_config();

    match cli.command {
        Command::Enrich { input, batch_size } => {
            let chain = build_chain(&config).await;
            let stdout = tokio::io::stdout();

            let stats = match input {
                Some(path) => {
                    let file = tokio::fs::File::open(&path)
                        .await
                        .with_context(|| format!("failed to open {}", path.display()))?;
                    enrich_stream(&chain, BufReader::new(file), stdout, batch_size).await?
                }
                None => {
                    let stdin = tokio::io::stdin();
                    enrich_stream(&chain, BufReader::new(stdin), stdout, batch_size).await?
                }
            };

            info!(
                "Enriched {} records ({} priced, {} passed through)",
                stats.records, stats.priced, stats.passed_through
            );
        }

        Command::Lookup {
            provider,
            model,
            json,
        } => {
            let enricher = load_cost_enricher(&config)
                .await
                .with_context(|| format!("failed to load pricing from {}", config.source_name()))?;
            let found = enricher.resolve(&provider, &model);

            if json {
                let output = json!({
                    "provider": provider,
                    "model": model,
                    "match": found,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                match found {
                    Some(found) => {
                        println!(
                            "{}/{} -> {} ({} match{})",
                            provider,
                            model,
                            found.canonical_name,
                            found.tier,
                            match found.namespace {
                                llmcost::matcher::Namespace::Provider => "",
                                llmcost::matcher::Namespace::CatchAll => ", custom prices",
                            }
                        );
                        println!("  input:  ${:.10} per token", found.entry.input_price());
                        println!("  output: ${:.10} per token", found.entry.output_price());
                    }
                    None => println!("{provider}/{model}: no price"),
                }
            }
        }

        Command::Cost {
            provider,
            model,
            input_tokens,
            output_tokens,
            json,
        } => {
            let enricher = load_cost_enricher(&config)
                .await
                .with_context(|| format!("failed to load pricing from {}", config.source_name()))?;
            let priced = enricher.compute(&provider, &model, input_tokens, output_tokens);

            if json {
                let output = json!({
                    "provider": provider,
                    "model": model,
                    "match": priced.as_ref().map(|(found, _)| found),
                    "cost": priced.as_ref().map(|(_, cost)| cost),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                match priced {
                    Some((found, cost)) => {
                        println!("{}/{} ({}): {}", provider, model, found.canonical_name, cost)
                    }
                    None => println!("{provider}/{model}: no price"),
                }
            }
        }

        Command::Validate => {
            let enricher = load_cost_enricher(&config)
                .await
                .with_context(|| format!("failed to load pricing from {}", config.source_name()))?;
            let table = enricher.table();

            println!("Source: {}", config.source_name());
            for provider in table.providers() {
                println!(
                    "  {:<16} {:>4} models",
                    provider,
                    table.all_model_names(provider).count()
                );
            }
            println!(
                "Total: {} models, {} aliases",
                table.len(),
                table.alias_count()
            );
        }
    }

    Ok(())
}
