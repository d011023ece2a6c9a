//! Pull-driven migration pipeline: one primary cursor over the source
//! history, a rewriter chain, and the destination sink. Strictly sequential;
//! a change set is fully resolved before the next one is read.

use crate::error::RewriteError;
use crate::event_model::ChangeSet;
use crate::rewriter::EventRewriter;
use crate::stream::{BufferSink, ChangeSetSink, ChangeSetSource};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Change sets with more events than this are logged with their per-type
/// event counts.
pub const DEFAULT_LOG_SIZE_THRESHOLD: usize = 1000;

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineSummary {
    pub change_sets_read: usize,
    pub change_sets_written: usize,
    pub cancelled: bool,
}

/// Drives change sets from a source through a rewriter chain into a sink.
/// Each stage may emit zero or many change sets per input, so stages are
/// buffered between. Errors from the source, a rewriter, or the sink abort
/// the run; cancellation is honored only between whole change sets.
pub struct MigrationPipeline<S: ChangeSetSource, K: ChangeSetSink> {
    source: S,
    rewriters: Vec<Box<dyn EventRewriter>>,
    sink: K,
    log_size_threshold: usize,
    cancel: Option<Arc<AtomicBool>>,
}

impl<S: ChangeSetSource, K: ChangeSetSink> MigrationPipeline<S, K> {
    pub fn new(source: S, rewriters: Vec<Box<dyn EventRewriter>>, sink: K) -> Self {
        Self {
            source,
            rewriters,
            sink,
            log_size_threshold: DEFAULT_LOG_SIZE_THRESHOLD,
            cancel: None,
        }
    }

    /// Overrides the oversized-change-set logging threshold.
    pub fn with_log_size_threshold(mut self, threshold: usize) -> Self {
        self.log_size_threshold = threshold;
        self
    }

    /// Installs a flag checked between change sets; raising it stops the run
    /// before the next read.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// The destination sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Consumes the pipeline, yielding the sink.
    pub fn into_sink(self) -> K {
        self.sink
    }

    /// Runs the migration to end of stream or cancellation.
    pub fn run(&mut self) -> Result<PipelineSummary, RewriteError> {
        let mut summary = PipelineSummary::default();
        loop {
            if self.is_cancelled() {
                summary.cancelled = true;
                info!(
                    change_sets_read = summary.change_sets_read,
                    "migration cancelled between change sets"
                );
                break;
            }
            let Some(change_set) = self.source.next()? else {
                break;
            };
            summary.change_sets_read += 1;
            self.log_oversized(&change_set);
            let mut pending = vec![change_set];
            for rewriter in &mut self.rewriters {
                let mut buffer = BufferSink::new();
                for change_set in pending {
                    rewriter.rewrite(change_set, &mut buffer)?;
                }
                pending = buffer.into_change_sets();
            }
            for change_set in pending {
                self.sink.write(change_set)?;
                summary.change_sets_written += 1;
            }
        }
        Ok(summary)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn log_oversized(&self, change_set: &ChangeSet) {
        if change_set.len() <= self.log_size_threshold {
            return;
        }
        let mut per_type: BTreeMap<&str, usize> = BTreeMap::new();
        for event in &change_set.events {
            *per_type.entry(event.type_name()).or_default() += 1;
        }
        info!(
            revision = %change_set.revision,
            events = change_set.len(),
            per_type = ?per_type,
            "processing oversized change set"
        );
    }
}
