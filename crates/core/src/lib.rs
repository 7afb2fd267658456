mod apply;
mod audit;
mod collision;
mod config;
mod planner;
mod rule;

pub use apply::{
    apply_plan, apply_plan_with_control, ApplyOptions, ApplyReport, ApplySummary, CancelFlag,
    ExecutionRecord, RecordStatus,
};
pub use audit::{default_log_name, log_rows, write_csv_log};
pub use collision::{
    next_available_name, resolve_collision, resolve_name, CollisionKind, CollisionPolicy,
};
pub use config::{app_paths, load_config, save_config, AppConfig, AppPaths};
pub use planner::{
    collect_files, plan_files, plan_folder, plan_paths, Decision, PlanEntry, PlanOptions,
    PlanStats, RenamePlan,
};
pub use rule::{MatchOutcome, MatchRule, RuleError};
