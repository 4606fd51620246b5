use nbfix_core::{
    BatchConfig, FixOptions, FixOutcome, FsNotebookRepository, Notebook, NotebookFixService,
    NotebookRepository, StoreError, StoreResult,
};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

fn write_notebook(path: &Path, value: &Value) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn blog_notebook() -> Value {
    json!({
        "nbformat": 4,
        "nbformat_minor": 4,
        "metadata": {"kernelspec": {"name": "python3", "display_name": "Python 3"}},
        "cells": [
            {
                "cell_type": "code",
                "execution_count": null,
                "metadata": {},
                "outputs": [],
                "source": "---\ntitle: Hello: World\ncomments: YES\n---\nbody"
            },
            {
                "cell_type": "code",
                "execution_count": 1,
                "metadata": {},
                "outputs": [],
                "source": ["print('hi')\n", "print('bye')"]
            },
            {
                "cell_type": "markdown",
                "id": "kept-id",
                "metadata": {},
                "source": []
            }
        ]
    })
}

/// Loads normally but refuses every save.
struct ReadOnlyRepository;

impl NotebookRepository for ReadOnlyRepository {
    fn load(&self, path: &Path) -> StoreResult<Notebook> {
        FsNotebookRepository::new().load(path)
    }

    fn save(&self, _path: &Path, _notebook: &Notebook) -> StoreResult<()> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only volume",
        )))
    }
}

#[test]
fn end_to_end_scenario_rewrites_first_cell_and_assigns_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("post.ipynb");
    write_notebook(&path, &blog_notebook());

    let service = NotebookFixService::new(FsNotebookRepository::new());
    assert!(matches!(service.fix_notebook(&path), FixOutcome::Normalized));

    let written = read_json(&path);
    let cells = written["cells"].as_array().unwrap();
    assert_eq!(cells[0]["cell_type"], "markdown");
    assert_eq!(
        cells[0]["source"],
        "---\ntitle: \"Hello: World\"\ncomments: true\n---\nbody"
    );
    assert_eq!(cells[1]["source"], json!(["print('hi')\n", "print('bye')"]));
    assert_eq!(cells[1]["execution_count"], 1);
    assert_eq!(cells[2]["id"], "kept-id");
    assert_eq!(written["nbformat_minor"], 5);
    assert_eq!(written["metadata"]["kernelspec"]["name"], "python3");

    let ids: HashSet<&str> = cells.iter().map(|cell| cell["id"].as_str().unwrap()).collect();
    assert_eq!(ids.len(), cells.len());
    assert!(ids.iter().all(|id| !id.is_empty()));
}

#[test]
fn second_run_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("post.ipynb");
    write_notebook(&path, &blog_notebook());

    let service = NotebookFixService::new(FsNotebookRepository::new());
    assert!(matches!(service.fix_notebook(&path), FixOutcome::Normalized));
    let after_first = fs::read_to_string(&path).unwrap();

    assert!(matches!(service.fix_notebook(&path), FixOutcome::Unchanged));
    assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
}

#[test]
fn unreadable_notebook_is_skipped_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.ipynb");
    fs::write(&path, "{\"cells\": [").unwrap();

    let service = NotebookFixService::new(FsNotebookRepository::new());
    assert!(matches!(
        service.fix_notebook(&path),
        FixOutcome::Skipped(StoreError::Parse(_))
    ));
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"cells\": [");
}

#[test]
fn dry_run_reports_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("post.ipynb");
    write_notebook(&path, &blog_notebook());
    let before = fs::read_to_string(&path).unwrap();

    let service = NotebookFixService::with_options(
        FsNotebookRepository::new(),
        FixOptions { dry_run: true },
    );
    let outcome = service.fix_notebook(&path);
    assert!(matches!(outcome, FixOutcome::WouldNormalize));
    assert!(outcome.has_changes());
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn batch_continues_past_failures() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("_notebooks");
    write_notebook(&root.join("a.ipynb"), &blog_notebook());
    fs::write(root.join("b.ipynb"), "not json").unwrap();
    write_notebook(&root.join("nested/c.ipynb"), &blog_notebook());

    let service = NotebookFixService::new(ReadOnlyRepository);
    let mut seen: Vec<PathBuf> = Vec::new();
    let report = service.run_batch_with(&BatchConfig::for_root(&root), |path, _| {
        seen.push(path.to_path_buf());
    });

    assert_eq!(report.entries.len(), 3);
    assert_eq!(report.failed(), 2);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.normalized(), 0);
    assert_eq!(
        seen,
        vec![
            root.join("a.ipynb"),
            root.join("b.ipynb"),
            root.join("nested/c.ipynb")
        ]
    );
    assert!(matches!(
        report.entries[0].outcome,
        FixOutcome::WriteFailed(StoreError::Io(_))
    ));
}

#[test]
fn batch_writes_only_changed_notebooks() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    write_notebook(&root.join("post.ipynb"), &blog_notebook());
    write_notebook(
        &root.join("clean.ipynb"),
        &json!({
            "nbformat": 4,
            "nbformat_minor": 5,
            "metadata": {},
            "cells": [{"cell_type": "code", "id": "c1", "metadata": {}, "outputs": [],
                       "execution_count": null, "source": "1 + 1"}]
        }),
    );
    let clean_before = fs::read_to_string(root.join("clean.ipynb")).unwrap();

    let service = NotebookFixService::new(FsNotebookRepository::new());
    let report = service.run_batch(&BatchConfig::for_root(&root));

    assert_eq!(report.normalized(), 1);
    assert_eq!(report.unchanged(), 1);
    assert_eq!(
        fs::read_to_string(root.join("clean.ipynb")).unwrap(),
        clean_before
    );

    let rerun = service.run_batch(&BatchConfig::for_root(&root));
    assert_eq!(rerun.normalized(), 0);
    assert_eq!(rerun.unchanged(), 2);
}

#[test]
fn missing_root_produces_empty_report() {
    let dir = tempfile::tempdir().unwrap();
    let service = NotebookFixService::new(FsNotebookRepository::new());
    let report = service.run_batch(&BatchConfig::for_root(dir.path().join("nowhere")));
    assert!(report.entries.is_empty());
}

#[test]
fn numbers_in_untouched_fields_keep_their_exact_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("numbers.ipynb");
    fs::write(
        &path,
        r#"{
 "cells": [
  {"cell_type": "code", "execution_count": 7, "metadata": {"scale": 2.50},
   "outputs": [], "source": "x = 1"}
 ],
 "metadata": {"big": 123456789012345678901234567890, "small": 1e-05, "pi": 3.141592653589793238},
 "nbformat": 4,
 "nbformat_minor": 4
}"#,
    )
    .unwrap();

    let service = NotebookFixService::new(FsNotebookRepository::new());
    assert!(matches!(service.fix_notebook(&path), FixOutcome::Normalized));

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"big\": 123456789012345678901234567890"), "{written}");
    assert!(written.contains("\"small\": 1e-05"), "{written}");
    assert!(written.contains("\"pi\": 3.141592653589793238"), "{written}");
    assert!(written.contains("\"scale\": 2.50"), "{written}");
    assert!(written.contains("\"execution_count\": 7"), "{written}");
    assert!(written.contains("\"nbformat_minor\": 5"), "{written}");
}
