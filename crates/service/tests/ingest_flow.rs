use codemap_model::{JobStatus, NodeKind};
use codemap_service::{Codemap, ServiceError};
use codemap_store::MemoryStore;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);
    for (name, content) in entries {
        writer
            .start_file(name.to_string(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

fn sample_archive(dir: &Path) -> std::path::PathBuf {
    let archive = dir.join("proj.zip");
    write_zip(
        &archive,
        &[
            ("proj/package.json", "{\"name\": \"proj\"}"),
            (
                "proj/src/main.ts",
                "import { helper } from './util';\nexport function main() {\n  return helper();\n}\n",
            ),
            (
                "proj/src/util.ts",
                "// Shared helper.\nexport function helper() {\n  return 1;\n}\n",
            ),
        ],
    );
    archive
}

async fn wait_terminal(service: &Codemap, job_id: &str) -> JobStatus {
    for _ in 0..200 {
        let view = service.job_status(job_id).await.unwrap();
        if view.status == JobStatus::Completed || view.status == JobStatus::Failed {
            return view.status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {job_id} never reached a terminal state");
}

#[tokio::test]
async fn submit_poll_and_reconcile() {
    let temp = tempfile::tempdir().unwrap();
    let archive = sample_archive(temp.path());
    let service = Codemap::new(Arc::new(MemoryStore::new()));

    let receipt = service.submit_archive(&archive).await.unwrap();

    // the wrapper dir is skipped: the immediate tree is rooted at proj
    assert_eq!(receipt.tree.path, "");
    assert!(receipt.tree.find("package.json").is_some());
    assert!(receipt.tree.find("src/main.ts").is_some());

    let status = wait_terminal(&service, &receipt.job_id).await;
    assert_eq!(status, JobStatus::Completed);

    let overview = service.reconciled_tree().await.unwrap();
    assert_eq!(overview.files, 2);
    assert_eq!(overview.functions, 2);
    assert_eq!(overview.folders, 1);

    let src = overview.tree.find("src").unwrap();
    assert_eq!(src.kind, NodeKind::Dir);
    let main = overview.tree.find("src/main.ts").unwrap();
    assert_eq!(main.children.len(), 1);
    assert_eq!(main.children[0].name, "ƒ main");
}

#[tokio::test]
async fn node_detail_reports_edges_both_ways() {
    let temp = tempfile::tempdir().unwrap();
    let archive = sample_archive(temp.path());
    let service = Codemap::new(Arc::new(MemoryStore::new()));

    let receipt = service.submit_archive(&archive).await.unwrap();
    wait_terminal(&service, &receipt.job_id).await;

    let main = service.node_detail("src/main.ts").await.unwrap();
    assert_eq!(main.imports, vec!["src/util.ts"]);
    assert!(main.imported_by.is_empty());
    assert_eq!(main.functions.len(), 1);
    assert_eq!(main.functions[0].name, "main");

    let util = service.node_detail("src/util.ts").await.unwrap();
    assert_eq!(util.imported_by, vec!["src/main.ts"]);
    assert_eq!(util.summary.as_deref(), Some("Shared helper."));
}

#[tokio::test]
async fn distinct_not_found_and_no_data_outcomes() {
    let service = Codemap::new(Arc::new(MemoryStore::new()));

    let err = service.job_status("nope").await.unwrap_err();
    assert!(matches!(err, ServiceError::JobNotFound(_)));

    let err = service.reconciled_tree().await.unwrap_err();
    assert!(matches!(err, ServiceError::NoData));

    let err = service.node_detail("src/ghost.ts").await.unwrap_err();
    assert!(matches!(err, ServiceError::FileNotFound(_)));
}

#[tokio::test]
async fn oversized_archive_is_rejected_without_a_job() {
    let temp = tempfile::tempdir().unwrap();
    let archive = temp.path().join("big.zip");
    std::fs::write(
        &archive,
        vec![0u8; (codemap_ingest::MAX_ARCHIVE_BYTES + 1) as usize],
    )
    .unwrap();

    let service = Codemap::new(Arc::new(MemoryStore::new()));
    let err = service.submit_archive(&archive).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Ingest(codemap_ingest::IngestError::TooLarge { .. })
    ));
}
