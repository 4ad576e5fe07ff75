use fstree::FileSystem;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn create_files(base: &Path, rels: &[&str]) {
    for rel in rels {
        let p = base.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(&p, format!("contents of {rel}")).unwrap();
    }
}

#[test]
fn can_delete_directory() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    create_files(td.path(), &["a/one.txt", "a/inner/two.txt"]);

    FileSystem::new().delete(td.path().join("a"))?;

    assert!(!td.path().join("a").exists());
    Ok(())
}

#[test]
fn can_delete_file() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    create_files(td.path(), &["a/one.txt", "a/two.txt"]);

    FileSystem::new().delete(td.path().join("a/one.txt"))?;

    assert!(!td.path().join("a/one.txt").exists());
    assert!(td.path().join("a/two.txt").exists());
    Ok(())
}

#[test]
fn deleting_missing_file_is_fine() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    let p = td.path().join("a/one.txt");

    FileSystem::new().delete(&p)?;

    assert!(!p.exists());
    Ok(())
}

#[test]
fn delete_twice_matches_delete_once() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    create_files(td.path(), &["a/one.txt", "a/inner/two.txt", "keep.txt"]);
    let fs_ops = FileSystem::new();

    fs_ops.delete(td.path().join("a"))?;
    let once: Vec<_> = fs::read_dir(td.path())?.map(|e| e.unwrap().path()).collect();
    fs_ops.delete(td.path().join("a"))?;
    let twice: Vec<_> = fs::read_dir(td.path())?.map(|e| e.unwrap().path()).collect();

    assert_eq!(once, twice);
    assert_eq!(once, vec![td.path().join("keep.txt")]);
    Ok(())
}
