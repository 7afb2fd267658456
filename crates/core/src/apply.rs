use crate::planner::{Decision, PlanEntry, RenamePlan};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Simulated,
    Renamed,
    Skipped,
    Failed,
}

impl RecordStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Simulated => "Simulated",
            RecordStatus::Renamed => "Renamed",
            RecordStatus::Skipped => "Skipped",
            RecordStatus::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub timestamp: DateTime<Local>,
    pub status: RecordStatus,
    pub original_path: PathBuf,
    pub final_path: PathBuf,
    pub reason: Decision,
    pub error: Option<String>,
}

impl ExecutionRecord {
    fn completed(entry: &PlanEntry, status: RecordStatus) -> Self {
        Self {
            timestamp: Local::now(),
            status,
            original_path: entry.original_path.clone(),
            final_path: entry.target_path.clone(),
            reason: entry.decision,
            error: None,
        }
    }

    fn failed(entry: &PlanEntry, error: io::Error) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::completed(entry, RecordStatus::Failed)
        }
    }

    pub fn skipped(entry: &PlanEntry) -> Self {
        Self::completed(entry, RecordStatus::Skipped)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ApplySummary {
    pub renamed: usize,
    pub simulated: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct ApplyReport {
    pub records: Vec<ExecutionRecord>,
    pub summary: ApplySummary,
}

#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub fn apply_plan(plan: &RenamePlan, options: &ApplyOptions) -> ApplyReport {
    apply_plan_with_control(plan, options, &CancelFlag::new(), |_| {})
}

pub fn apply_plan_with_control(
    plan: &RenamePlan,
    options: &ApplyOptions,
    cancel: &CancelFlag,
    mut on_record: impl FnMut(&ExecutionRecord),
) -> ApplyReport {
    let mut records = Vec::new();
    let mut summary = ApplySummary::default();

    // Strictly sequential: concurrent renames in one directory could
    // invalidate each other's collision resolution.
    for entry in plan.entries.iter().filter(|entry| entry.will_rename()) {
        if cancel.is_cancelled() {
            break;
        }

        let record = if options.dry_run {
            summary.simulated += 1;
            ExecutionRecord::completed(entry, RecordStatus::Simulated)
        } else {
            match rename_entry(entry) {
                Ok(()) => {
                    summary.renamed += 1;
                    ExecutionRecord::completed(entry, RecordStatus::Renamed)
                }
                Err(err) => {
                    summary.failed += 1;
                    ExecutionRecord::failed(entry, err)
                }
            }
        };

        on_record(&record);
        records.push(record);
    }

    ApplyReport { records, summary }
}

fn rename_entry(entry: &PlanEntry) -> io::Result<()> {
    // Skip- and number-policy targets were free at plan time; an occupied
    // target here is a race with an external writer and must surface as a
    // failure, never a silent overwrite.
    if entry.decision != Decision::MatchOverwrite && entry.target_path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("target already exists: {}", entry.target_path.display()),
        ));
    }

    fs::rename(&entry.original_path, &entry.target_path)
}
