//! Tests for the 'delete' command

use test_utils::{ArchiveFormat, BackupError, ResultAssertions, TestContext};

#[test]
fn test_delete_removes_only_target() {
    let ctx = TestContext::new();
    let source = ctx.create_source_tree("proj");
    let manager = ctx.manager();

    let first = manager.create(&source, ArchiveFormat::Zip, 0, None).assert_ok();
    let second = manager.create(&source, ArchiveFormat::Zip, 0, None).assert_ok();

    manager.delete(&first.snapshot.archive_path).assert_ok();

    assert!(!first.snapshot.archive_path.exists());
    assert!(second.snapshot.archive_path.exists());
    assert_eq!(ctx.backup_files(), vec![second.snapshot.file_name()]);
}

#[test]
fn test_delete_missing_has_no_side_effects() {
    let ctx = TestContext::new();
    let source = ctx.create_source_tree("proj");
    let manager = ctx.manager();
    manager.create(&source, ArchiveFormat::Zip, 0, None).assert_ok();
    let before = ctx.backup_files();

    let result = manager.delete(&ctx.backup_dir().join("proj_19990101_000000.zip"));

    assert!(matches!(result, Err(BackupError::ArchiveNotFound(_))));
    assert_eq!(ctx.backup_files(), before);
}

#[test]
fn test_delete_directory_is_not_an_archive() {
    let ctx = TestContext::new();
    let dir = ctx.create_subdir("backups/proj_20250101_000000.zip");

    let result = ctx.manager().delete(&dir);

    assert!(matches!(result, Err(BackupError::ArchiveNotFound(_))));
    assert!(dir.is_dir());
}

#[test]
fn test_delete_then_list() {
    let ctx = TestContext::new();
    let source = ctx.create_source_tree("proj");
    let manager = ctx.manager();
    let report = manager.create(&source, ArchiveFormat::Tar, 0, None).assert_ok();

    manager.delete(&report.snapshot.archive_path).assert_ok();

    assert!(manager.list(None).assert_ok().is_empty());
}
