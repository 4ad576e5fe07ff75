use fstree::{FileSystem, FsTreeError, RelativePath};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use walkdir::WalkDir;

fn create_files(base: &Path, rels: &[&str]) {
    for rel in rels {
        let p = base.join(rel);
        FileSystem::new().create_directory(p.parent().unwrap()).unwrap();
        fs::write(&p, format!("contents of {rel}")).unwrap();
    }
}

fn assert_file_contents(path: &Path, contents: &str) {
    assert!(path.is_file(), "expected {} to exist", path.display());
    assert_eq!(fs::read_to_string(path).unwrap(), contents);
}

fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}

#[test]
fn can_copy_directory() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    let (a, b) = (td.path().join("a"), td.path().join("b"));
    create_files(td.path(), &["a/one.txt", "a/inner/two.txt"]);

    FileSystem::new().copy(&a, &b, None)?;

    assert_file_contents(&a.join("one.txt"), "contents of a/one.txt");
    assert_file_contents(&a.join("inner/two.txt"), "contents of a/inner/two.txt");
    assert_file_contents(&b.join("one.txt"), "contents of a/one.txt");
    assert_file_contents(&b.join("inner/two.txt"), "contents of a/inner/two.txt");
    Ok(())
}

#[test]
fn can_copy_directory_excluding_some_files() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    let (a, b) = (td.path().join("a"), td.path().join("b"));
    create_files(td.path(), &["a/one.bad", "a/inner/two.txt"]);

    let not_bad = |rel: &RelativePath| rel.extension().is_none_or(|e| e != "bad");
    FileSystem::new().copy(&a, &b, Some(&not_bad))?;

    assert_file_contents(&a.join("one.bad"), "contents of a/one.bad");
    assert!(!b.join("one.bad").exists());
    assert_file_contents(&b.join("inner/two.txt"), "contents of a/inner/two.txt");
    Ok(())
}

#[test]
fn excluded_directory_hides_whole_subtree() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    let (a, b) = (td.path().join("a"), td.path().join("b"));
    create_files(td.path(), &["a/keep.txt", "a/skip/wanted.txt", "a/skip/deep/wanted.txt"]);

    // Files are always wanted; only the directory rule can exclude them.
    let rule = |rel: &RelativePath| !(rel.is_dir() && rel.starts_with("skip"));
    FileSystem::new().copy(&a, &b, Some(&rule))?;

    assert!(b.join("keep.txt").is_file());
    assert!(!b.join("skip").exists());
    Ok(())
}

#[test]
fn copy_preserves_source_tree() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    let (a, b) = (td.path().join("a"), td.path().join("b"));
    create_files(td.path(), &["a/one.txt", "a/x/two.bin", "a/x/y/three.txt", "a/z/four.txt"]);
    let before = snapshot(&a);

    FileSystem::new().copy(&a, &b, None)?;

    assert_eq!(snapshot(&a), before);
    assert_eq!(snapshot(&b), before);
    Ok(())
}

#[test]
fn can_copy_file() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    create_files(td.path(), &["a/one.txt"]);

    FileSystem::new().copy(td.path().join("a/one.txt"), td.path().join("b/one.txt"), None)?;

    assert_file_contents(&td.path().join("a/one.txt"), "contents of a/one.txt");
    assert_file_contents(&td.path().join("b/one.txt"), "contents of a/one.txt");
    Ok(())
}

#[test]
fn can_copy_a_file_to_directory() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    create_files(td.path(), &["a/one.txt"]);

    FileSystem::new().copy_to_directory(td.path().join("a/one.txt"), td.path().join("b"), None)?;

    assert_file_contents(&td.path().join("a/one.txt"), "contents of a/one.txt");
    assert_file_contents(&td.path().join("b/one.txt"), "contents of a/one.txt");
    Ok(())
}

#[test]
fn can_copy_a_directory_to_directory() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    create_files(td.path(), &["a/one.txt", "a/inner/two.txt"]);

    FileSystem::new().copy_to_directory(td.path().join("a"), td.path().join("b"), None)?;

    assert_file_contents(&td.path().join("a/one.txt"), "contents of a/one.txt");
    assert_file_contents(&td.path().join("b/a/one.txt"), "contents of a/one.txt");
    assert_file_contents(&td.path().join("b/a/inner/two.txt"), "contents of a/inner/two.txt");
    Ok(())
}

#[test]
fn copy_does_not_overwrite_existing_file() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    create_files(td.path(), &["a/one.txt", "b/one.txt"]);
    fs::write(td.path().join("b/one.txt"), "keep me")?;

    let err = FileSystem::new()
        .copy(td.path().join("a"), td.path().join("b"), None)
        .unwrap_err();

    assert!(matches!(err, FsTreeError::AlreadyExists(ref p) if p.ends_with("b/one.txt")), "got {err:?}");
    assert_file_contents(&td.path().join("b/one.txt"), "keep me");
    Ok(())
}

#[test]
fn copy_missing_source_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    let err = FileSystem::new()
        .copy(td.path().join("nope.txt"), td.path().join("out/nope.txt"), None)
        .unwrap_err();
    assert!(matches!(err, FsTreeError::NotFound(_)), "got {err:?}");
    assert!(!td.path().join("out").exists(), "failed copy must not create directories");
    Ok(())
}

#[test]
fn copy_keeps_file_sitting_at_destination() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    create_files(td.path(), &["a/one.txt"]);
    let b = td.path().join("b");
    fs::write(&b, "precious")?;

    let err = FileSystem::new().copy(td.path().join("a"), &b, None).unwrap_err();
    assert!(matches!(err, FsTreeError::Io { .. }), "got {err:?}");
    assert_file_contents(&b, "precious");

    let err = FileSystem::new()
        .copy(td.path().join("a/one.txt"), b.join("one.txt"), None)
        .unwrap_err();
    assert!(matches!(err, FsTreeError::Io { .. }), "got {err:?}");
    assert_file_contents(&b, "precious");
    Ok(())
}
