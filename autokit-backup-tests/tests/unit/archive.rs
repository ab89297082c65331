//! Unit tests for the archive codec

use autokit_backup::utils::archive::{extract_archive, write_archive, ArchiveSource};
use rstest::rstest;
use std::fs::File;
use std::path::Path;
use test_utils::{assert_same_tree, ArchiveFormat, OptionAssertions, TestContext};

#[rstest]
#[case("zip", ArchiveFormat::Zip)]
#[case("ZIP", ArchiveFormat::Zip)]
#[case("tar", ArchiveFormat::Tar)]
#[case("tar.gz", ArchiveFormat::TarGz)]
#[case("tgz", ArchiveFormat::TarGz)]
fn test_parse_format(#[case] input: &str, #[case] expected: ArchiveFormat) {
    assert_eq!(input.parse::<ArchiveFormat>().unwrap(), expected);
}

#[test]
fn test_parse_unknown_format() {
    let err = "7z".parse::<ArchiveFormat>().unwrap_err();
    assert!(err.contains("7z"));
}

#[rstest]
#[case("/b/proj_20250101_000000.zip", ArchiveFormat::Zip)]
#[case("/b/proj_20250101_000000.tar", ArchiveFormat::Tar)]
#[case("/b/proj_20250101_000000.tar.gz", ArchiveFormat::TarGz)]
fn test_format_from_path(#[case] path: &str, #[case] expected: ArchiveFormat) {
    assert_eq!(ArchiveFormat::from_path(Path::new(path)).assert_some(), expected);
}

#[test]
fn test_format_from_unknown_path() {
    ArchiveFormat::from_path(Path::new("/b/notes.txt")).assert_none();
    ArchiveFormat::from_path(Path::new("/b/archive.gz")).assert_none();
}

#[rstest]
#[case(ArchiveFormat::Zip)]
#[case(ArchiveFormat::Tar)]
#[case(ArchiveFormat::TarGz)]
fn test_write_then_extract_keeps_tree(#[case] format: ArchiveFormat) {
    let ctx = TestContext::new();
    let source = ctx.create_source_tree("proj");
    let archive = ctx.temp_dir().join(format!("out.{}", format.extension()));

    let mut out = File::create(&archive).unwrap();
    write_archive(format, &ArchiveSource::new(&source, "proj"), &mut out).unwrap();
    drop(out);

    let target = ctx.create_subdir("target");
    extract_archive(format, &archive, &target).unwrap();

    assert_same_tree(&source, &target.join("proj"));
}

#[rstest]
#[case(ArchiveFormat::Zip)]
#[case(ArchiveFormat::Tar)]
#[case(ArchiveFormat::TarGz)]
fn test_extract_garbage_fails(#[case] format: ArchiveFormat) {
    let ctx = TestContext::new();
    let archive = ctx.temp_dir().join(format!("junk.{}", format.extension()));
    std::fs::write(&archive, "this is not an archive\n".repeat(100)).unwrap();

    let target = ctx.create_subdir("target");
    assert!(extract_archive(format, &archive, &target).is_err());
}
