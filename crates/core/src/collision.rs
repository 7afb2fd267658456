use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    #[default]
    Skip,
    Overwrite,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    Skip,
    Overwrite,
    Numbered,
}

pub fn resolve_collision(
    parent: &Path,
    desired_name: &str,
    policy: CollisionPolicy,
) -> (String, Option<CollisionKind>) {
    resolve_name(desired_name, policy, |name| parent.join(name).exists())
}

pub fn resolve_name(
    desired_name: &str,
    policy: CollisionPolicy,
    exists: impl Fn(&str) -> bool,
) -> (String, Option<CollisionKind>) {
    if !exists(desired_name) {
        return (desired_name.to_string(), None);
    }

    match policy {
        CollisionPolicy::Skip => (desired_name.to_string(), Some(CollisionKind::Skip)),
        CollisionPolicy::Overwrite => (desired_name.to_string(), Some(CollisionKind::Overwrite)),
        CollisionPolicy::Number => (
            next_available_name(desired_name, &exists),
            Some(CollisionKind::Numbered),
        ),
    }
}

pub fn next_available_name(desired_name: &str, exists: &impl Fn(&str) -> bool) -> String {
    let (stem, ext) = split_at_extension(desired_name);

    let mut n = 1usize;
    loop {
        let candidate = format!("{} ({}){}", stem, n, ext);
        if !exists(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn split_at_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(index) if index > 0 => name.split_at(index),
        _ => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::{next_available_name, resolve_collision, resolve_name, CollisionKind, CollisionPolicy};
    use std::collections::HashSet;
    use std::fs;
    use tempfile::tempdir;

    fn taken(names: &[&str]) -> HashSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn free_target_resolves_to_itself_under_every_policy() {
        let existing = taken(&[]);
        for policy in [
            CollisionPolicy::Skip,
            CollisionPolicy::Overwrite,
            CollisionPolicy::Number,
        ] {
            let (name, kind) = resolve_name("AI_doc.txt", policy, |name| existing.contains(name));
            assert_eq!(name, "AI_doc.txt");
            assert_eq!(kind, None);
        }
    }

    #[test]
    fn skip_policy_keeps_the_name_and_reports_the_collision() {
        let existing = taken(&["AI_doc.txt"]);
        let (name, kind) =
            resolve_name("AI_doc.txt", CollisionPolicy::Skip, |name| existing.contains(name));
        assert_eq!(name, "AI_doc.txt");
        assert_eq!(kind, Some(CollisionKind::Skip));
    }

    #[test]
    fn overwrite_policy_keeps_the_occupied_name() {
        let existing = taken(&["AI_doc.txt"]);
        let (name, kind) = resolve_name("AI_doc.txt", CollisionPolicy::Overwrite, |name| {
            existing.contains(name)
        });
        assert_eq!(name, "AI_doc.txt");
        assert_eq!(kind, Some(CollisionKind::Overwrite));
    }

    #[test]
    fn numbering_picks_the_first_free_suffix() {
        let existing = taken(&["AI_doc.txt", "AI_doc (1).txt"]);
        let (name, kind) =
            resolve_name("AI_doc.txt", CollisionPolicy::Number, |name| existing.contains(name));
        assert_eq!(name, "AI_doc (2).txt");
        assert_eq!(kind, Some(CollisionKind::Numbered));
    }

    #[test]
    fn numbering_splits_at_the_last_dot() {
        let existing = taken(&["AI_archive.tar.gz"]);
        let name = next_available_name("AI_archive.tar.gz", &|name| existing.contains(name));
        assert_eq!(name, "AI_archive.tar (1).gz");
    }

    #[test]
    fn numbering_without_extension_appends_the_suffix() {
        let existing = taken(&["AI_notes"]);
        let name = next_available_name("AI_notes", &|name| existing.contains(name));
        assert_eq!(name, "AI_notes (1)");
    }

    #[test]
    fn resolution_probes_the_target_directory() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join("AI_doc.txt"), b"x").expect("create existing target");

        let (name, kind) = resolve_collision(temp.path(), "AI_doc.txt", CollisionPolicy::Number);
        assert_eq!(name, "AI_doc (1).txt");
        assert_eq!(kind, Some(CollisionKind::Numbered));
    }
}
