mod common;

use common::{file, folder, folder_ref};
use copy_contents::collector::collect;
use copy_contents::errors::AggregationError;
use copy_contents::filter::{check_eligibility, filter_eligible, is_eligible};
use copy_contents::storage::{Entry, FileRef, LocalVault};
use copy_contents::AggregationSettings;
use std::collections::BTreeSet;
use tempfile::tempdir;

fn small_settings() -> AggregationSettings {
    AggregationSettings {
        max_file_size: 2,
        ..AggregationSettings::default()
    }
}

#[test]
fn test_eligibility_matches_size_and_extension_rule() {
    let settings = small_settings();
    let limit = settings.max_file_size * 1024;

    for size in [0, 1, limit - 1, limit, limit + 1, limit * 10] {
        for name in ["a.md", "b.TXT", "c.Py", "d.png", "e", "f.md.bak"] {
            let file = FileRef::new(&format!("Notes/{}", name), size);
            let expected =
                size <= limit && settings.file_extensions.contains(&file.extension.to_lowercase());
            assert_eq!(
                is_eligible(&file, &settings),
                expected,
                "{} with {} bytes",
                name,
                size
            );
        }
    }
}

#[test]
fn test_size_is_checked_before_extension() {
    let settings = small_settings();
    let file = FileRef::new("huge.png", 10_000);
    match check_eligibility(&file, &settings) {
        Err(AggregationError::FileTooLarge { size, max_kb }) => {
            assert_eq!(size, 10_000);
            assert_eq!(max_kb, 2);
        }
        other => panic!("expected FileTooLarge, got {:?}", other),
    }

    let file = FileRef::new("small.png", 10);
    let err = check_eligibility(&file, &settings).unwrap_err();
    assert_eq!(err.code(), "UNSUPPORTED_EXTENSION");
}

#[test]
fn test_filter_keeps_collection_order() {
    let settings = AggregationSettings::default();
    let files = vec![
        FileRef::new("z.md", 1),
        FileRef::new("image.png", 1),
        FileRef::new("a.txt", 1),
    ];
    let kept: Vec<String> = filter_eligible(files, &settings)
        .into_iter()
        .map(|f| f.path)
        .collect();
    assert_eq!(kept, vec!["z.md", "a.txt"]);
}

#[test]
fn test_collect_returns_every_file_at_any_depth() {
    let tree = folder_ref(
        "Projects",
        vec![
            file("Projects/readme.md", 10),
            folder(
                "Projects/alpha",
                vec![
                    file("Projects/alpha/plan.md", 20),
                    folder(
                        "Projects/alpha/deep",
                        vec![folder(
                            "Projects/alpha/deep/deeper",
                            vec![file("Projects/alpha/deep/deeper/log.txt", 5)],
                        )],
                    ),
                ],
            ),
            folder("Projects/empty", vec![]),
            file("Projects/image.png", 300),
        ],
    );

    let collected: BTreeSet<String> = collect(&tree).into_iter().map(|f| f.path).collect();
    let expected: BTreeSet<String> = [
        "Projects/readme.md",
        "Projects/alpha/plan.md",
        "Projects/alpha/deep/deeper/log.txt",
        "Projects/image.png",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    assert_eq!(collected, expected);
}

#[test]
fn test_collect_is_stable_for_a_snapshot() {
    let tree = folder_ref(
        "root",
        vec![
            folder("root/b", vec![file("root/b/1.md", 1)]),
            file("root/a.md", 1),
        ],
    );
    assert_eq!(collect(&tree), collect(&tree));
    assert!(collect(&folder_ref("empty", vec![])).is_empty());
}

#[test]
fn test_local_vault_snapshot() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("Notes/daily")).unwrap();
    std::fs::create_dir_all(root.join(".obsidian")).unwrap();
    std::fs::write(root.join("Notes/b.md"), "bee").unwrap();
    std::fs::write(root.join("Notes/a.md"), "a").unwrap();
    std::fs::write(root.join("Notes/daily/today.md"), "today").unwrap();
    std::fs::write(root.join("Notes/.hidden.md"), "secret").unwrap();
    std::fs::write(root.join(".obsidian/app.json"), "{}").unwrap();

    let vault = LocalVault::new(root);
    let notes = vault.folder("Notes").unwrap();
    assert_eq!(notes.name, "Notes");
    assert_eq!(notes.path, "Notes");

    let files = collect(&notes);
    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["Notes/a.md", "Notes/b.md", "Notes/daily/today.md"]);
    assert_eq!(files[1].size, 3);
    assert_eq!(files[2].name, "today.md");
    assert_eq!(files[2].extension, "md");

    let everything: Vec<String> = collect(&vault.folder("").unwrap())
        .into_iter()
        .map(|f| f.path)
        .collect();
    assert!(!everything.iter().any(|p| p.contains(".obsidian")));
    assert_eq!(everything.len(), 3);
}

#[test]
fn test_local_vault_entry_lookup() {
    let dir = tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("Notes")).unwrap();
    std::fs::write(dir.path().join("Notes/a.md"), "hello").unwrap();
    let vault = LocalVault::new(dir.path());

    match vault.entry("./Notes/a.md").unwrap() {
        Entry::File(f) => {
            assert_eq!(f.path, "Notes/a.md");
            assert_eq!(f.size, 5);
        }
        other => panic!("expected a file, got {:?}", other),
    }
    assert!(matches!(vault.entry("Notes").unwrap(), Entry::Folder(_)));
    assert_eq!(vault.entry("missing.md").unwrap_err().code(), "NOT_FOUND");
}
