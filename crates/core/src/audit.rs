use crate::apply::ExecutionRecord;
use crate::planner::{Decision, RenamePlan};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;

const CSV_HEADER: &str = "timestamp,status,old_path,new_path,reason,error";

pub fn default_log_name(now: DateTime<Local>) -> String {
    format!("prefix_rename_log_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

/// One row per processed entry, in plan order: collision skips become
/// `Skipped` rows, executed entries reuse the executor's records verbatim.
pub fn log_rows(plan: &RenamePlan, records: &[ExecutionRecord]) -> Vec<ExecutionRecord> {
    let mut rows = Vec::with_capacity(records.len() + plan.stats.collision_skipped);
    let mut pending = records.iter();
    let mut next = pending.next();

    for entry in &plan.entries {
        if entry.decision == Decision::CollisionSkip {
            rows.push(ExecutionRecord::skipped(entry));
            continue;
        }
        if !entry.will_rename() {
            continue;
        }

        // Records are a plan-order prefix of the renameable entries; a
        // missing tail means the batch was cancelled before reaching them.
        if let Some(record) = next {
            if record.original_path == entry.original_path {
                rows.push(record.clone());
                next = pending.next();
            }
        }
    }

    rows
}

pub fn write_csv_log(path: &Path, rows: &[ExecutionRecord]) -> Result<()> {
    let mut body = String::from(CSV_HEADER);
    body.push('\n');

    for row in rows {
        let fields = [
            row.timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
            row.status.as_str().to_string(),
            row.original_path.display().to_string(),
            row.final_path.display().to_string(),
            row.reason.label().to_string(),
            row.error.clone().unwrap_or_default(),
        ];
        let escaped: Vec<String> = fields.iter().map(|field| csv_field(field)).collect();
        body.push_str(&escaped.join(","));
        body.push('\n');
    }

    fs::write(path, body).with_context(|| format!("could not write CSV log: {}", path.display()))
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{default_log_name, log_rows, write_csv_log, CSV_HEADER};
    use crate::apply::{apply_plan, ApplyOptions, ExecutionRecord, RecordStatus};
    use crate::collision::CollisionPolicy;
    use crate::planner::{plan_folder, Decision, PlanOptions};
    use chrono::Local;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn log_merges_skip_rows_with_executor_records_in_plan_order() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join("a_RAG.txt"), b"a").expect("renameable file");
        fs::write(temp.path().join("b_RAG.txt"), b"b").expect("colliding file");
        fs::write(temp.path().join("AI_b_RAG.txt"), b"x").expect("occupied target");

        let options = PlanOptions {
            collision: CollisionPolicy::Skip,
            ..PlanOptions::default()
        };
        let plan = plan_folder(temp.path(), &options).expect("plan");
        let report = apply_plan(&plan, &ApplyOptions { dry_run: true });
        let rows = log_rows(&plan, &report.records);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].status, RecordStatus::Simulated);
        assert!(rows[0].original_path.ends_with("a_RAG.txt"));
        assert_eq!(rows[1].status, RecordStatus::Skipped);
        assert_eq!(rows[1].reason, Decision::CollisionSkip);
        assert!(rows[1].error.is_none());
    }

    #[test]
    fn csv_log_has_the_header_and_quotes_awkward_fields() {
        let temp = tempdir().expect("tempdir");
        let record = ExecutionRecord {
            timestamp: Local::now(),
            status: RecordStatus::Failed,
            original_path: PathBuf::from("/data/a, b.txt"),
            final_path: PathBuf::from("/data/AI_a, b.txt"),
            reason: Decision::Match,
            error: Some("denied: \"read-only\"".to_string()),
        };

        let log_path = temp.path().join("log.csv");
        write_csv_log(&log_path, &[record]).expect("write log");
        let body = fs::read_to_string(&log_path).expect("read log");
        let mut lines = body.lines();

        assert_eq!(lines.next(), Some(CSV_HEADER));
        let row = lines.next().expect("data row");
        assert!(row.contains("\"/data/a, b.txt\""));
        assert!(row.contains("\"denied: \"\"read-only\"\"\""));
        assert!(row.contains(",Failed,"));
        assert!(row.contains(",match,"));
    }

    #[test]
    fn log_name_embeds_a_second_precision_timestamp() {
        let name = default_log_name(Local::now());
        assert!(name.starts_with("prefix_rename_log_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "prefix_rename_log_YYYYmmdd_HHMMSS.csv".len());
    }
}
