// Standard library
use std::error::Error;

// 3rd party crates
use futures::future::join_all;
use serde_json::json;
use tracing::{debug, error, info};

// Project imports
use cloudstore::{CloudStore, StoreResult, UploadFile};

const DEMO_FILE: &str = "Shopping_List";

/// Walks through every storage operation against the configured service.
///
/// - Saves a shopping list and uploads a small text file
/// - Merges new items into the list, then loads it back
/// - Lists files matching "Shopping"
/// - Deletes the list
pub async fn run(
    store: CloudStore,
    password: Option<String>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let password: Option<&str> = password.as_deref();
    info!(
        "🕰️ Requests are spaced at least {:?} apart",
        store.gate().min_interval()
    );

    // Both leave immediately; the gate spaces them out.
    let save = store
        .save(DEMO_FILE, json!({"Apples": 8, "Oranges": 6}), password)
        .on_complete(report("save"));
    let upload = store
        .upload(UploadFile::new("file.txt", b"myfile".to_vec(), "text/plain"), password)
        .on_complete(report("upload"));
    for joined in join_all([save, upload]).await {
        joined?;
    }

    let merged: StoreResult = store
        .merge(
            DEMO_FILE,
            json!({"Apples": 8, "Oranges": 10, "Bananas": 8}),
            password,
        )
        .await;
    let merge_succeeded = merged.is_ok();
    report("merge")(merged);

    // Reload to see the merged list
    if merge_succeeded {
        store
            .load(DEMO_FILE, password)
            .on_complete(report("load"))
            .await?;
    } else {
        debug!("Skipping reload after failed merge");
    }

    store
        .list("Shopping", password)
        .on_complete(report("list"))
        .await?;

    store
        .delete(DEMO_FILE, password)
        .on_complete(report("delete"))
        .await?;

    Ok(())
}

/// Builds a completion callback that logs the outcome of `operation`.
fn report(operation: &'static str) -> impl FnOnce(StoreResult) + Send + 'static {
    move |result| match result {
        Ok(res) => {
            let text: String = res
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| res.data.to_string());
            info!(operation = %operation, status = %res.response.status, "{}", text);
        }
        Err(e) => {
            error!(operation = %operation, kind = %e.kind(), "Error: {}", e.message());
        }
    }
}
