//! Integration tests for the Shoal S3 client.
//!
//! These tests require a running S3-compatible server (MinIO, LocalStack,
//! or real S3) and are marked `#[ignore]` so they don't run during normal
//! `cargo test`.
//!
//! Configure the target with `S3_ENDPOINT`, `S3_ACCESS_KEY_ID`,
//! `S3_SECRET_ACCESS_KEY`, and optionally `S3_REGION` (the defaults match
//! a local MinIO), then run:
//!
//! ```text
//! cargo test -p shoal-integration -- --ignored
//! ```

use std::sync::Once;

use shoal_s3::{S3Client, S3Config};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}

/// Create a client for the given bucket, pointing at the configured server.
#[must_use]
pub fn s3_client(bucket: &str) -> S3Client {
    init_tracing();

    let config = S3Config::new(
        env_or("S3_ACCESS_KEY_ID", "minioadmin"),
        env_or("S3_SECRET_ACCESS_KEY", "minioadmin"),
        env_or("S3_ENDPOINT", "http://localhost:9000"),
        bucket,
    )
    .expect("valid test configuration")
    .with_region(env_or("S3_REGION", "us-east-1"));

    S3Client::new(config).expect("client construction")
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("shoal-test-{prefix}-{id}")
}

/// Create a fresh bucket and return a client bound to it.
pub async fn create_test_client(prefix: &str) -> S3Client {
    let client = s3_client(&test_bucket_name(prefix));
    client
        .create_bucket()
        .await
        .unwrap_or_else(|e| panic!("failed to create test bucket: {e}"));
    client
}

/// Delete all objects and abort all in-flight multipart uploads in the
/// client's bucket. (The bucket itself is left behind; bucket deletion is
/// outside the client's surface.)
pub async fn cleanup_bucket(client: &S3Client) {
    if let Ok(entries) = client.list(None, None, 1000).await {
        for entry in entries {
            let _ = client.delete(&entry.key).await;
        }
    }

    if let Ok(uploads) = client.list_multipart_uploads(None, None).await {
        for upload in uploads {
            let _ = client
                .abort_multipart_upload(&upload.key, &upload.upload_id)
                .await;
        }
    }
}

mod test_list;
mod test_multipart;
mod test_object;
mod test_range;
