//! Tests for keep-last-N retention
//!
//! Retention runs after every successful create and only ever touches the
//! family (base name) that was just backed up.

use rstest::rstest;
use test_utils::{ArchiveFormat, ResultAssertions, TestContext};

#[test]
fn test_three_creates_keep_two() {
    let ctx = TestContext::new();
    let source = ctx.create_source_tree("proj");
    let manager = ctx.manager();

    let first = manager.create(&source, ArchiveFormat::Zip, 2, None).assert_ok();
    manager.create(&source, ArchiveFormat::Zip, 2, None).assert_ok();
    let third = manager.create(&source, ArchiveFormat::Zip, 2, None).assert_ok();

    assert_eq!(third.pruned, vec![first.snapshot.archive_path.clone()]);

    let remaining = manager.list(None).assert_ok();
    assert_eq!(remaining.len(), 2);
    assert!(remaining
        .iter()
        .all(|s| s.created_at > first.snapshot.created_at));
}

#[rstest]
#[case(1, 1)]
#[case(1, 4)]
#[case(3, 2)]
#[case(3, 6)]
#[case(5, 5)]
fn test_keeps_most_recent(#[case] keep: u32, #[case] creates: usize) {
    let ctx = TestContext::new();
    let source = ctx.create_source_tree("proj");
    let manager = ctx.manager();

    let created: Vec<_> = (0..creates)
        .map(|_| {
            manager
                .create(&source, ArchiveFormat::Tar, keep, None)
                .assert_ok()
                .snapshot
        })
        .collect();

    let remaining = manager.list(None).assert_ok();
    let expected: Vec<_> = created.iter().rev().take(keep as usize).cloned().collect();

    assert_eq!(remaining.len(), creates.min(keep as usize));
    assert_eq!(
        remaining.iter().map(|s| &s.archive_path).collect::<Vec<_>>(),
        expected.iter().map(|s| &s.archive_path).collect::<Vec<_>>()
    );
}

#[test]
fn test_zero_keeps_everything() {
    let ctx = TestContext::new();
    let source = ctx.create_source_tree("proj");
    let manager = ctx.manager();

    for _ in 0..6 {
        let report = manager.create(&source, ArchiveFormat::Zip, 0, None).assert_ok();
        assert!(report.pruned.is_empty());
    }

    assert_eq!(ctx.backup_files().len(), 6);
}

#[test]
fn test_lowering_keep_prunes_on_next_create() {
    let ctx = TestContext::new();
    let source = ctx.create_source_tree("proj");
    let manager = ctx.manager();

    for _ in 0..5 {
        manager.create(&source, ArchiveFormat::Zip, 5, None).assert_ok();
    }
    assert_eq!(ctx.backup_files().len(), 5);

    let report = manager.create(&source, ArchiveFormat::Zip, 2, None).assert_ok();

    assert_eq!(report.pruned.len(), 4);
    assert_eq!(ctx.backup_files().len(), 2);
}

#[test]
fn test_retention_spans_formats() {
    let ctx = TestContext::new();
    let source = ctx.create_source_tree("proj");
    let manager = ctx.manager();

    manager.create(&source, ArchiveFormat::Zip, 2, None).assert_ok();
    manager.create(&source, ArchiveFormat::Tar, 2, None).assert_ok();
    manager.create(&source, ArchiveFormat::TarGz, 2, None).assert_ok();

    let formats: Vec<_> = manager
        .list(None)
        .assert_ok()
        .into_iter()
        .map(|s| s.format)
        .collect();
    assert_eq!(formats, vec![ArchiveFormat::TarGz, ArchiveFormat::Tar]);
}

#[test]
fn test_retention_leaves_other_families() {
    let ctx = TestContext::new();
    let proj = ctx.create_source_tree("proj");
    let other = ctx.create_source_tree("other");
    let manager = ctx.manager();

    manager.create(&other, ArchiveFormat::Zip, 0, None).assert_ok();
    manager.create(&proj, ArchiveFormat::Zip, 0, Some("proj_old")).assert_ok();
    manager.create(&proj, ArchiveFormat::Zip, 0, Some("proj_old")).assert_ok();

    for _ in 0..3 {
        manager.create(&proj, ArchiveFormat::Zip, 1, None).assert_ok();
    }

    let families = |prefix: &str| {
        manager
            .list(None)
            .assert_ok()
            .into_iter()
            .filter(|s| s.base_name == prefix)
            .count()
    };
    assert_eq!(families("proj"), 1);
    assert_eq!(families("proj_old"), 2);
    assert_eq!(families("other"), 1);
}

#[test]
fn test_retention_ignores_foreign_files() {
    let ctx = TestContext::new();
    let source = ctx.create_source_tree("proj");
    let manager = ctx.manager();
    ctx.create_file("backups/proj_notes.txt", "keep me");

    for _ in 0..3 {
        manager.create(&source, ArchiveFormat::Zip, 1, None).assert_ok();
    }

    assert!(ctx.file_exists("backups/proj_notes.txt"));
    assert_eq!(ctx.backup_files().len(), 2);
}
