use sinkwell_storage_sqlite::{initialize_context, ServiceContext};
use tempfile::TempDir;

/// Builds a fresh database in a temporary directory and wires the full
/// service graph over it. The TempDir must outlive the test.
pub async fn setup() -> (TempDir, ServiceContext) {
    // A DATABASE_URL leaking in from the environment would point every test
    // at one shared file.
    std::env::remove_var("DATABASE_URL");

    let tmp = tempfile::tempdir().unwrap();
    let context = initialize_context(tmp.path().to_str().unwrap())
        .await
        .unwrap();

    (tmp, context)
}
