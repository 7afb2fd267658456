use crate::collision::{resolve_collision, CollisionKind, CollisionPolicy};
use crate::rule::{MatchOutcome, MatchRule};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub pattern: String,
    pub prefix: String,
    pub recursive: bool,
    pub ignore_case: bool,
    pub whole_word: bool,
    pub skip_already_prefixed: bool,
    pub collision: CollisionPolicy,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            pattern: "RAG".to_string(),
            prefix: "AI_".to_string(),
            recursive: false,
            ignore_case: false,
            whole_word: false,
            skip_already_prefixed: true,
            collision: CollisionPolicy::Skip,
        }
    }
}

impl PlanOptions {
    pub fn build_rule(&self) -> Result<MatchRule> {
        Ok(MatchRule::new(
            &self.pattern,
            &self.prefix,
            self.ignore_case,
            self.whole_word,
            self.skip_already_prefixed,
        )?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    AlreadyPrefixed,
    NoMatch,
    Match,
    CollisionSkip,
    MatchOverwrite,
    MatchNumbered,
}

impl Decision {
    pub fn will_rename(self) -> bool {
        matches!(
            self,
            Decision::Match | Decision::MatchOverwrite | Decision::MatchNumbered
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Decision::AlreadyPrefixed => "already_prefixed",
            Decision::NoMatch => "no_match",
            Decision::Match => "match",
            Decision::CollisionSkip => "collision_skip",
            Decision::MatchOverwrite => "match_overwrite",
            Decision::MatchNumbered => "match_numbered",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanEntry {
    pub original_path: PathBuf,
    pub target_path: PathBuf,
    pub decision: Decision,
}

impl PlanEntry {
    pub fn will_rename(&self) -> bool {
        self.decision.will_rename()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlanStats {
    pub scanned: usize,
    pub matched: usize,
    pub already_prefixed: usize,
    pub no_match: usize,
    pub collision_skipped: usize,
    pub to_rename: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePlan {
    pub pattern: String,
    pub prefix: String,
    pub entries: Vec<PlanEntry>,
    pub stats: PlanStats,
}

pub fn plan_folder(folder: &Path, options: &PlanOptions) -> Result<RenamePlan> {
    if !folder.is_dir() {
        anyhow::bail!("target folder does not exist: {}", folder.display());
    }

    let candidates = collect_files(folder, options.recursive)?;
    plan_paths(candidates, options)
}

pub fn plan_files(paths: &[PathBuf], options: &PlanOptions) -> Result<RenamePlan> {
    let candidates: Vec<PathBuf> = paths.iter().filter(|path| path.is_file()).cloned().collect();
    plan_paths(candidates, options)
}

pub fn plan_paths(candidates: Vec<PathBuf>, options: &PlanOptions) -> Result<RenamePlan> {
    // Rule construction happens before the first candidate so configuration
    // errors never leave a partial plan behind.
    let rule = options.build_rule()?;

    let mut stats = PlanStats::default();
    let mut entries = Vec::with_capacity(candidates.len());

    for path in candidates {
        let entry = plan_candidate(path, &rule, options.collision);
        stats.scanned += 1;
        match entry.decision {
            Decision::AlreadyPrefixed => stats.already_prefixed += 1,
            Decision::NoMatch => stats.no_match += 1,
            Decision::CollisionSkip => {
                stats.matched += 1;
                stats.collision_skipped += 1;
            }
            Decision::Match | Decision::MatchOverwrite | Decision::MatchNumbered => {
                stats.matched += 1;
                stats.to_rename += 1;
            }
        }
        entries.push(entry);
    }

    Ok(RenamePlan {
        pattern: options.pattern.clone(),
        prefix: options.prefix.clone(),
        entries,
        stats,
    })
}

fn plan_candidate(path: PathBuf, rule: &MatchRule, policy: CollisionPolicy) -> PlanEntry {
    let name = path
        .file_name()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_default();

    match rule.decide(&name) {
        MatchOutcome::AlreadyPrefixed => PlanEntry {
            target_path: path.clone(),
            original_path: path,
            decision: Decision::AlreadyPrefixed,
        },
        MatchOutcome::NoMatch => PlanEntry {
            target_path: path.clone(),
            original_path: path,
            decision: Decision::NoMatch,
        },
        MatchOutcome::Matched { desired_name } => {
            let parent = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
            let (final_name, kind) = resolve_collision(&parent, &desired_name, policy);
            let decision = match kind {
                None => Decision::Match,
                Some(CollisionKind::Skip) => Decision::CollisionSkip,
                Some(CollisionKind::Overwrite) => Decision::MatchOverwrite,
                Some(CollisionKind::Numbered) => Decision::MatchNumbered,
            };

            PlanEntry {
                target_path: parent.join(final_name),
                original_path: path,
                decision,
            }
        }
    }
}

pub fn collect_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();

    if recursive {
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry =
                entry.with_context(|| format!("could not walk folder: {}", root.display()))?;
            if entry.file_type().is_file() {
                out.push(entry.path().to_path_buf());
            }
        }
    } else {
        for entry in fs::read_dir(root)
            .with_context(|| format!("could not read folder: {}", root.display()))?
        {
            let entry =
                entry.with_context(|| format!("could not read an entry of: {}", root.display()))?;
            let path = entry.path();
            if path.is_file() {
                out.push(path);
            }
        }
        out.sort();
    }

    Ok(out)
}
