//! The core extraction loop: walker -> filter -> title set.
//!
//! Single-threaded and pull-based. Each record is fully processed (evaluated,
//! collected, its reclamation scheduled) before the next chunk of the stream
//! is parsed, so the filter always sees exactly the state materialized when
//! the record's container closed.

use crate::config::PROGRESS_INTERVAL;
use crate::filter::TitleFilter;
use crate::models::{RecordState, Termination};
use crate::parser::{DumpWalker, NsSpec};
use crate::titles::TitleSet;
use anyhow::Result;
use indicatif::ProgressBar;
use std::io::BufRead;
use tracing::{info, warn};

/// Everything a finished walk hands back to the caller. On abort the title
/// set still holds whatever was collected before the failure point.
pub struct Extraction {
    pub titles: TitleSet,
    pub termination: Termination,
    pub pages_seen: u64,
    pub pages_matched: u64,
}

/// Open a dump (decompressing `.bz2` transparently) and collect every title
/// accepted by `filter`. Only filter compilation and file opening can fail
/// here; parse failures mid-stream end the walk with a partial result.
pub fn run_extraction(
    path: &str,
    ns: NsSpec,
    filter: &TitleFilter,
    limit: Option<u64>,
) -> Result<Extraction> {
    let mut walker = DumpWalker::from_path(path, ns)?;
    info!("Extracting titles from: {}", path);
    Ok(walk(&mut walker, filter, limit))
}

/// Drive a walker to termination, feeding accepted titles into a fresh set.
pub fn walk<R: BufRead>(
    walker: &mut DumpWalker<R>,
    filter: &TitleFilter,
    limit: Option<u64>,
) -> Extraction {
    let pb = ProgressBar::new_spinner();
    let mut titles = TitleSet::new();
    let mut pages_seen = 0u64;
    let mut pages_matched = 0u64;

    let termination = loop {
        if limit.is_some_and(|l| pages_seen >= l) {
            info!(limit = pages_seen, "Page limit reached");
            break Termination::Exhausted;
        }
        match walker.next_record() {
            Ok(Some(record)) => {
                pages_seen += 1;
                if pages_seen % PROGRESS_INTERVAL == 0 {
                    pb.tick();
                }
                if let Some(title) = accepted_title(filter, &record) {
                    pages_matched += 1;
                    titles.offer(title);
                }
            }
            Ok(None) => break Termination::Exhausted,
            Err(e) => {
                let position = walker.buffer_position();
                warn!(position, error = %e, "Parse aborted, keeping titles collected so far");
                break Termination::Aborted {
                    position,
                    reason: format!("{:#}", e),
                };
            }
        }
    };

    pb.finish_and_clear();
    info!(
        pages = pages_seen,
        matched = pages_matched,
        titles = titles.len(),
        "Walk finished"
    );

    Extraction {
        titles,
        termination,
        pages_seen,
        pages_matched,
    }
}

fn accepted_title(filter: &TitleFilter, record: &RecordState) -> Option<String> {
    let title = record.title.as_deref()?;
    if title.is_empty() || !filter.accept(record) {
        return None;
    }
    Some(title.to_string())
}
