use fstree::FileSystem;
use std::cell::Cell;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn create_files(base: &Path, rels: &[&str]) {
    for rel in rels {
        let p = base.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(&p, format!("contents of {rel}")).unwrap();
    }
}

fn set_of(base: &Path, rels: &[&str]) -> BTreeSet<PathBuf> {
    rels.iter().map(|r| base.join(r)).collect()
}

#[test]
fn can_enumerate_all_files_in_a_directory() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    create_files(td.path(), &["a/one.txt", "a/b/two.txt"]);
    let a = td.path().join("a");

    let paths = FileSystem::new().find(&a, None).collect::<Result<BTreeSet<_>, _>>()?;

    let mut want = set_of(td.path(), &["a/one.txt", "a/b", "a/b/two.txt"]);
    want.insert(a);
    assert_eq!(paths, want);
    Ok(())
}

#[test]
fn wont_recurse_into_rejected_directory() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    create_files(td.path(), &["a/one.txt", "a/b/two.txt"]);
    let a = td.path().join("a");
    let b = a.join("b");

    let fs_ops = FileSystem::new();
    let paths = fs_ops
        .find(&a, Some(Box::new(|dir: &Path| dir != b)))
        .collect::<Result<BTreeSet<_>, _>>()?;

    assert_eq!(paths, [a.clone(), a.join("one.txt")].into_iter().collect());
    Ok(())
}

#[test]
fn find_is_lazy() {
    let td = tempdir().unwrap();
    create_files(td.path(), &["a/one.txt", "a/b/two.txt"]);

    let fs_ops = FileSystem::new();
    let _paths = fs_ops.find(
        td.path().join("a"),
        Some(Box::new(|_: &Path| -> bool {
            panic!("this shouldn't be called because we haven't accessed the enumeration yet!")
        })),
    );
}

#[test]
fn root_first_and_children_before_grandchildren() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    create_files(td.path(), &["r/f1.txt", "r/d1/g1.txt", "r/d2/g2.txt", "r/f2.txt"]);
    let r = td.path().join("r");

    let paths: Vec<PathBuf> = FileSystem::new().find(&r, None).collect::<Result<_, _>>()?;

    assert_eq!(paths[0], r);
    let pos = |p: PathBuf| paths.iter().position(|x| *x == p).unwrap();
    let last_child = [r.join("f1.txt"), r.join("f2.txt"), r.join("d1"), r.join("d2")]
        .into_iter()
        .map(pos)
        .max()
        .unwrap();
    let first_grandchild = [r.join("d1/g1.txt"), r.join("d2/g2.txt")].into_iter().map(pos).min().unwrap();
    assert!(last_child < first_grandchild, "order was {paths:?}");
    // Files of a directory come before its subdirectories.
    assert!(pos(r.join("f2.txt")) < pos(r.join("d1")));
    Ok(())
}

#[test]
fn stopping_early_stops_predicate_calls() -> Result<(), Box<dyn std::error::Error>> {
    let td = tempdir()?;
    create_files(td.path(), &["a/one.txt", "a/b/two.txt", "a/c/three.txt"]);

    let calls = Cell::new(0);
    let fs_ops = FileSystem::new();
    let first_two: Vec<_> = fs_ops
        .find(
            td.path().join("a"),
            Some(Box::new(|_: &Path| {
                calls.set(calls.get() + 1);
                true
            })),
        )
        .take(2)
        .collect::<Result<_, _>>()?;

    assert_eq!(first_two, vec![td.path().join("a"), td.path().join("a/one.txt")]);
    assert_eq!(calls.get(), 0);
    Ok(())
}
