//! Shared helpers for bunch-core integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use bunch_core::SwitchOptions;
use bunch_git::GitRepository;
use bunch_test_utils::repo::TestRepo;

pub fn open(repo: &TestRepo) -> GitRepository {
    GitRepository::open(repo.root()).unwrap()
}

/// Options that skip the unresolved-switch history check.
pub fn unchecked() -> SwitchOptions {
    SwitchOptions {
        history_window: 0,
        ..SwitchOptions::default()
    }
}

/// Every file under `root` except `.git`, with its content.
pub fn snapshot(root: &Path) -> BTreeMap<String, String> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<String, String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.file_name().is_some_and(|n| n == ".git") {
                continue;
            }
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/");
                out.insert(rel, fs::read_to_string(&path).unwrap());
            }
        }
    }

    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}
