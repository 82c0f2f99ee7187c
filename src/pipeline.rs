//! JSONL record processing with sequential and parallel strategies.
//!
//! Each input line is one headword occurrence; each output line is the
//! paradigm extracted for it. Parallel strategies use only std threads and
//! channels, and always write records back in input order:
//! - Sequential (baseline)
//! - Batch-parallel (scoped threads over fixed-size batches)
//! - Channel-pipeline (reader thread, worker threads, reordering writer)

use std::collections::BTreeMap;
use std::io::{BufRead, BufWriter, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classify::ParadigmKind;
use crate::error::PipelineError;
use crate::forms::FormTable;
use crate::markup::is_pre_reform;
use crate::paradigm::extract_paradigm;
use crate::schema::PosMap;
use crate::tags::{AnnotatedSpan, TableSpans};

/// Configuration for parallel processing
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Number of threads for batch-parallel processing
    pub num_threads: usize,
    /// Records per batch for batch-parallel processing
    pub batch_size: usize,
    /// Channel buffer size for pipeline processing
    pub channel_buffer: usize,
    /// Number of worker threads for pipeline
    pub num_workers: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        let cpus = thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(4);
        Self {
            num_threads: cpus,
            batch_size: 1000,
            channel_buffer: 10000,
            num_workers: cpus.saturating_sub(1).max(1),
        }
    }
}

/// One headword occurrence as produced by the page scraper.
///
/// `spans` carries pre-harvested form-of spans; otherwise they are read
/// from the `table` markup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputRecord {
    pub headword: String,
    #[serde(default)]
    pub pos: String,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub spans: Option<Vec<AnnotatedSpan>>,
    #[serde(default)]
    pub cyrillic: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub headword: String,
    pub pos: String,
    pub form_type: Option<ParadigmKind>,
    pub forms: FormTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Extracted(ParadigmKind),
    NoParadigm,
    PreReform,
    ShapeError,
    Malformed,
}

/// Result of processing one input line
#[derive(Debug)]
pub struct ProcessedLine {
    pub line_id: usize,
    pub record: Option<OutputRecord>,
    pub outcome: Outcome,
}

#[derive(Debug, Default)]
pub struct Stats {
    pub records_read: usize,
    pub records_written: usize,
    pub with_forms: usize,
    pub verbs: usize,
    pub nouns: usize,
    pub adjectives: usize,
    pub no_paradigm: usize,
    pub pre_reform: usize,
    pub shape_errors: usize,
    pub malformed: usize,
    pub elapsed: Duration,
}

impl Stats {
    fn record(&mut self, line: &ProcessedLine) {
        self.records_read += 1;
        match line.outcome {
            Outcome::Extracted(kind) => {
                self.with_forms += 1;
                match kind {
                    ParadigmKind::Verb => self.verbs += 1,
                    ParadigmKind::Noun | ParadigmKind::Pronoun => self.nouns += 1,
                    ParadigmKind::Adjective => self.adjectives += 1,
                }
            }
            Outcome::NoParadigm => self.no_paradigm += 1,
            Outcome::PreReform => self.pre_reform += 1,
            Outcome::ShapeError => self.shape_errors += 1,
            Outcome::Malformed => self.malformed += 1,
        }
    }
}

/// Extract the paradigm for one record. Extraction failures are logged
/// and leave the record without forms.
pub fn process_record(record: InputRecord, pos_map: &PosMap) -> (OutputRecord, Outcome) {
    let mut output = OutputRecord {
        headword: record.headword.trim().to_string(),
        pos: pos_map.normalize(&record.pos),
        form_type: None,
        forms: FormTable::new(),
    };

    let spans = match (record.spans, record.table) {
        (Some(form_of), _) => TableSpans {
            form_of,
            cyrillic: record.cyrillic,
        },
        (None, Some(table)) if is_pre_reform(&table) => {
            debug!(headword = %output.headword, "skipping pre-reform table");
            return (output, Outcome::PreReform);
        }
        (None, Some(table)) => TableSpans::harvest(&table),
        (None, None) => TableSpans {
            form_of: Vec::new(),
            cyrillic: record.cyrillic,
        },
    };

    match extract_paradigm(&output.headword, &spans) {
        Ok(paradigm) => {
            let outcome = paradigm.kind.map_or(Outcome::NoParadigm, Outcome::Extracted);
            output.form_type = paradigm.kind;
            output.forms = paradigm.forms;
            (output, outcome)
        }
        Err(e) => {
            warn!(headword = %output.headword, error = %e, "dropping inflection table");
            (output, Outcome::ShapeError)
        }
    }
}

/// Parse and process one JSONL input line
pub fn process_line(line_id: usize, line: &str, pos_map: &PosMap) -> ProcessedLine {
    match serde_json::from_str::<InputRecord>(line) {
        Ok(record) => {
            let (output, outcome) = process_record(record, pos_map);
            ProcessedLine {
                line_id,
                record: Some(output),
                outcome,
            }
        }
        Err(e) => {
            warn!(record = line_id, error = %e, "skipping malformed input record");
            ProcessedLine {
                line_id,
                record: None,
                outcome: Outcome::Malformed,
            }
        }
    }
}

/// Non-blank input lines, numbered from zero, up to `limit`.
///
/// Lines are decoded lossily so that a stray invalid byte turns into a
/// malformed record instead of a read error.
fn numbered_lines(
    reader: impl BufRead,
    limit: Option<usize>,
) -> impl Iterator<Item = std::io::Result<(usize, String)>> {
    reader
        .split(b'\n')
        .map(|line| line.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
        .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
        .take(limit.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(id, line)| line.map(|l| (id, l)))
}

fn write_processed<W: Write>(
    writer: &mut W,
    line: ProcessedLine,
    stats: &mut Stats,
) -> Result<(), PipelineError> {
    stats.record(&line);
    if let Some(record) = line.record {
        let json = serde_json::to_string(&record)?;
        writeln!(writer, "{}", json)?;
        stats.records_written += 1;
    }
    Ok(())
}

/// Sequential processing with a progress spinner
pub fn run_sequential<W: Write>(
    reader: impl BufRead,
    writer: &mut BufWriter<W>,
    pos_map: &PosMap,
    limit: Option<usize>,
    quiet: bool,
) -> Result<Stats, PipelineError> {
    let start_time = Instant::now();
    let mut stats = Stats::default();

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    for item in numbered_lines(reader, limit) {
        let (line_id, line) = item?;
        let processed = process_line(line_id, &line, pos_map);
        write_processed(writer, processed, &mut stats)?;

        if stats.records_read % 1000 == 0 {
            pb.set_message(format!(
                "Records: {} | With forms: {}",
                stats.records_read, stats.with_forms
            ));
        }
    }

    writer.flush()?;
    pb.finish_and_clear();
    stats.elapsed = start_time.elapsed();
    Ok(stats)
}

/// Batch-parallel processing: collect records into batches, then split
/// each batch across scoped threads.
pub fn process_batch_parallel<W: Write>(
    reader: impl BufRead,
    writer: &mut BufWriter<W>,
    config: &ParallelConfig,
    pos_map: &PosMap,
    limit: Option<usize>,
) -> Result<Stats, PipelineError> {
    let start_time = Instant::now();
    let mut stats = Stats::default();
    let mut batch: Vec<(usize, String)> = Vec::with_capacity(config.batch_size);

    for item in numbered_lines(reader, limit) {
        batch.push(item?);
        if batch.len() >= config.batch_size {
            for processed in process_batch_threaded(&batch, config.num_threads, pos_map) {
                write_processed(writer, processed, &mut stats)?;
            }
            batch.clear();
        }
    }

    for processed in process_batch_threaded(&batch, config.num_threads, pos_map) {
        write_processed(writer, processed, &mut stats)?;
    }

    writer.flush()?;
    stats.elapsed = start_time.elapsed();
    Ok(stats)
}

fn process_batch_threaded(
    batch: &[(usize, String)],
    num_threads: usize,
    pos_map: &PosMap,
) -> Vec<ProcessedLine> {
    if batch.is_empty() {
        return vec![];
    }

    let num_threads = num_threads.min(batch.len()).max(1);
    let chunk_size = batch.len().div_ceil(num_threads);

    thread::scope(|scope| {
        let handles: Vec<_> = batch
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|(line_id, line)| process_line(*line_id, line, pos_map))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut results = Vec::with_capacity(batch.len());
        for handle in handles {
            match handle.join() {
                Ok(chunk_results) => results.extend(chunk_results),
                Err(_) => warn!("batch worker panicked; its records were dropped"),
            }
        }
        results
    })
}

/// Channel-pipeline processing: a reader thread feeds worker threads, and
/// the calling thread writes results in input order.
pub fn process_channel_pipeline<W: Write>(
    reader: impl BufRead + Send,
    writer: W,
    config: &ParallelConfig,
    pos_map: &PosMap,
    limit: Option<usize>,
) -> Result<Stats, PipelineError> {
    let start_time = Instant::now();
    let (line_tx, line_rx): (SyncSender<(usize, String)>, Receiver<(usize, String)>) =
        sync_channel(config.channel_buffer);
    let (result_tx, result_rx): (SyncSender<ProcessedLine>, Receiver<ProcessedLine>) =
        sync_channel(config.channel_buffer);
    let line_rx = Arc::new(Mutex::new(line_rx));

    // Set once the writer gives up, so the reader and workers stop early
    let stop = AtomicBool::new(false);

    let (written, read) = thread::scope(|scope| {
        let reader_stop = &stop;
        let reader_handle =
            scope.spawn(move || read_lines_to_channel(reader, line_tx, limit, reader_stop));

        for _ in 0..config.num_workers.max(1) {
            let rx = Arc::clone(&line_rx);
            let tx = result_tx.clone();
            let worker_stop = &stop;
            scope.spawn(move || process_lines_worker(rx, tx, pos_map, worker_stop));
        }

        // Workers own the line receiver now; it closes when the last one exits
        drop(line_rx);
        // Drop extra sender so the result channel closes when workers finish
        drop(result_tx);

        let written = write_results_sorted(result_rx, writer);
        if written.is_err() {
            stop.store(true, Ordering::SeqCst);
        }
        (written, reader_handle.join())
    });

    let mut stats = written?;
    match read {
        Ok(Ok(count)) => debug!(records = count, "reader finished"),
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => warn!("reader thread panicked; output may be incomplete"),
    }

    stats.elapsed = start_time.elapsed();
    Ok(stats)
}

fn read_lines_to_channel(
    reader: impl BufRead,
    tx: SyncSender<(usize, String)>,
    limit: Option<usize>,
    stop: &AtomicBool,
) -> std::io::Result<usize> {
    let mut count = 0;
    for item in numbered_lines(reader, limit) {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        if tx.send(item?).is_err() {
            break;
        }
        count += 1;
    }
    Ok(count)
}

fn process_lines_worker(
    rx: Arc<Mutex<Receiver<(usize, String)>>>,
    tx: SyncSender<ProcessedLine>,
    pos_map: &PosMap,
    stop: &AtomicBool,
) {
    while !stop.load(Ordering::Relaxed) {
        let item = {
            let lock = rx.lock().ok();
            lock.and_then(|guard| guard.recv().ok())
        };

        match item {
            Some((line_id, line)) => {
                if tx.send(process_line(line_id, &line, pos_map)).is_err() {
                    break;
                }
            }
            None => break,
        }
    }
}

/// Write results in input order using a streaming reorder buffer.
fn write_results_sorted<W: Write>(
    rx: Receiver<ProcessedLine>,
    writer: W,
) -> Result<Stats, PipelineError> {
    let mut writer = BufWriter::with_capacity(256 * 1024, writer);
    let mut stats = Stats::default();

    // Results that arrived before their predecessors
    let mut pending: BTreeMap<usize, ProcessedLine> = BTreeMap::new();
    let mut next_expected: usize = 0;

    for result in rx {
        if result.line_id != next_expected {
            pending.insert(result.line_id, result);
            continue;
        }

        write_processed(&mut writer, result, &mut stats)?;
        next_expected += 1;

        while let Some(buffered) = pending.remove(&next_expected) {
            write_processed(&mut writer, buffered, &mut stats)?;
            next_expected += 1;
        }
    }

    // Gaps only appear if a worker died mid-record
    for (_, result) in std::mem::take(&mut pending) {
        write_processed(&mut writer, result, &mut stats)?;
    }

    writer.flush()?;
    Ok(stats)
}
