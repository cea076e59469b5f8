//! Record pipeline
//!
//! Builds the enrichment chain from configuration and streams JSONL telemetry
//! records through it. Pricing problems never stop the pipeline: if the price
//! table cannot be loaded the chain simply runs without the cost step, and
//! input lines that are not valid records are passed through unchanged.

use async_stream::try_stream;
use futures::stream::{Stream, StreamExt};
use llmcost_core::attributes;
use llmcost_core::config::PricingConfig;
use llmcost_core::enricher::EnricherChain;
use llmcost_core::error::{LlmcostError, Result};
use llmcost_core::record::{AttributeValue, UsageRecord};
use llmcost_pricing::{CostEnricher, PricingLoader, PricingSource};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

/// Default number of records enriched together
pub const DEFAULT_BATCH_SIZE: usize = 512;

/// Load the configured price table and wrap it in a [`CostEnricher`]
///
/// Unlike [`build_chain`], this surfaces load errors to the caller.
pub async fn load_cost_enricher(config: &PricingConfig) -> Result<CostEnricher> {
    let loader = PricingLoader::new(PricingSource::from_config(config));
    let table = loader.load_table().await?;
    Ok(CostEnricher::new(Arc::new(table)))
}

/// Build the enrichment chain for a configuration
///
/// The cost step is appended only when pricing is enabled and its table
/// loads. A load failure is logged and leaves the rest of the chain intact.
pub async fn build_chain(config: &PricingConfig) -> EnricherChain {
    let mut chain = EnricherChain::new();

    if !config.enabled {
        info!("Cost enrichment disabled by configuration");
        return chain;
    }

    match load_cost_enricher(config).await {
        Ok(enricher) => {
            info!("Cost enrichment enabled using {}", config.source_name());
            chain.push(enricher);
        }
        Err(e) => {
            warn!(
                "Cost enrichment disabled: failed to load pricing from {}: {}",
                config.source_name(),
                e
            );
        }
    }

    chain
}

/// One line of pipeline input
#[derive(Debug, Clone, PartialEq)]
pub enum InputLine {
    /// A line that parsed as a record
    Record(UsageRecord),
    /// A line that did not; written back out verbatim
    Raw(String),
}

/// Read JSONL records, skipping blank lines
///
/// Lines that fail to parse are yielded as [`InputLine::Raw`] rather than as
/// errors; only I/O failures end the stream with an error.
pub fn read_records<R>(reader: R) -> impl Stream<Item = Result<InputLine>>
where
    R: AsyncBufRead + Unpin,
{
    try_stream! {
        let mut lines = reader.lines();
        let mut line_number = 0usize;

        while let Some(line) = lines.next_line().await.map_err(LlmcostError::from)? {
            line_number += 1;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<UsageRecord>(&line) {
                Ok(record) => yield InputLine::Record(record),
                Err(e) => {
                    warn!("Passing through line {} unchanged: {}", line_number, e);
                    yield InputLine::Raw(line);
                }
            }
        }
    }
}

/// Counters reported by [`enrich_stream`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    /// Lines that parsed as records
    pub records: usize,
    /// Records whose cost attribute was added or changed by the chain
    pub priced: usize,
    /// Lines written back unchanged because they did not parse
    pub passed_through: usize,
}

/// Stream records from `reader` through `chain` into `writer` as JSONL
///
/// Records are enriched in batches of `batch_size`; output order matches
/// input order.
pub async fn enrich_stream<R, W>(
    chain: &EnricherChain,
    reader: R,
    mut writer: W,
    batch_size: usize,
) -> Result<PipelineStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let batch_size = batch_size.max(1);
    let mut stats = PipelineStats::default();
    let mut batch = Batch::with_capacity(batch_size);

    let lines = read_records(reader);
    futures::pin_mut!(lines);

    while let Some(line) = lines.next().await {
        batch.push(line?);
        if batch.len() >= batch_size {
            batch.flush(chain, &mut writer, &mut stats).await?;
        }
    }
    batch.flush(chain, &mut writer, &mut stats).await?;
    writer.flush().await?;

    debug!("Pipeline finished: {:?}", stats);
    Ok(stats)
}

enum Slot {
    Record(usize),
    Raw(String),
}

/// Input lines awaiting enrichment, with their original order
struct Batch {
    records: Vec<UsageRecord>,
    slots: Vec<Slot>,
}

impl Batch {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
        }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn push(&mut self, line: InputLine) {
        match line {
            InputLine::Record(record) => {
                self.slots.push(Slot::Record(self.records.len()));
                self.records.push(record);
            }
            InputLine::Raw(raw) => self.slots.push(Slot::Raw(raw)),
        }
    }

    async fn flush<W>(
        &mut self,
        chain: &EnricherChain,
        writer: &mut W,
        stats: &mut PipelineStats,
    ) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        if self.slots.is_empty() {
            return Ok(());
        }

        let costs_before: Vec<Option<AttributeValue>> = self
            .records
            .iter()
            .map(|record| record.attribute(attributes::COST).cloned())
            .collect();

        chain.apply_batch(&mut self.records);

        for slot in self.slots.drain(..) {
            let line = match slot {
                Slot::Record(index) => {
                    let record = &self.records[index];
                    stats.records += 1;
                    let cost = record.attribute(attributes::COST);
                    if cost.is_some() && cost != costs_before[index].as_ref() {
                        stats.priced += 1;
                    }
                    serde_json::to_string(record)?
                }
                Slot::Raw(raw) => {
                    stats.passed_through += 1;
                    raw
                }
            };
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
        self.records.clear();

        Ok(())
    }
}
