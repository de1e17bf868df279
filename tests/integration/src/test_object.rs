//! Object round-trip, metadata, and conditional-read integration tests.

#[cfg(test)]
mod tests {
    use shoal_s3::GetConditions;

    use crate::{cleanup_bucket, create_test_client};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_round_trip_put_and_get() {
        let client = create_test_client("roundtrip").await;

        let etag = client.put("k", "Hello").await.expect("put");
        assert!(etag.is_some(), "put should report an ETag");

        let body = client.get("k", None).await.expect("get");
        assert_eq!(body.as_deref(), Some("Hello"));

        let length = client.get_content_length("k").await.expect("head");
        assert_eq!(length, Some(5));

        cleanup_bucket(&client).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_none_for_missing_key() {
        let client = create_test_client("missing").await;

        let body = client.get("does-not-exist", None).await.expect("get");
        assert_eq!(body, None);
        assert_eq!(
            client.get_content_length("does-not-exist").await.expect("head"),
            None
        );

        cleanup_bucket(&client).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_three_valued_existence() {
        let client = create_test_client("exists").await;
        client.put("present.txt", "content").await.expect("put");

        // Existing key: Some(true).
        assert_eq!(
            client.file_exists("present.txt", None).await.expect("head"),
            Some(true)
        );

        // Nonexistent key: Some(false).
        assert_eq!(
            client.file_exists("absent.txt", None).await.expect("head"),
            Some(false)
        );

        // Existing key with a stale if-match ETag: None (412, not an error).
        let stale = GetConditions::if_match("0000deadbeef0000");
        assert_eq!(
            client
                .file_exists("present.txt", Some(&stale))
                .await
                .expect("head"),
            None
        );

        cleanup_bucket(&client).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_get_object_with_matching_etag() {
        let client = create_test_client("etag").await;
        client.put("doc.txt", "versioned content").await.expect("put");

        let etag = client.get_etag("doc.txt", None).await.expect("etag");
        let etag = etag.expect("object exists");
        assert!(!etag.contains('"'), "ETag should be sanitized: {etag}");

        // A matching if-match returns the body.
        let matched = client
            .get_with_etag("doc.txt", Some(&GetConditions::if_match(etag.clone())))
            .await
            .expect("get");
        let matched = matched.expect("condition holds");
        assert_eq!(matched.body, "versioned content");
        assert_eq!(matched.etag.as_deref(), Some(etag.as_str()));

        // if-none-match with the same ETag suppresses the body (304).
        let suppressed = client
            .get_with_etag("doc.txt", Some(&GetConditions::if_none_match(etag)))
            .await
            .expect("get");
        assert_eq!(suppressed, None);

        cleanup_bucket(&client).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_store_folder_marker_with_trailing_slash() {
        let client = create_test_client("folder").await;

        client.put("archive/", bytes::Bytes::new()).await.expect("put marker");
        assert_eq!(
            client.file_exists("archive/", None).await.expect("head"),
            Some(true)
        );
        assert_eq!(
            client.get_content_length("archive/").await.expect("head"),
            Some(0)
        );

        cleanup_bucket(&client).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_delete_idempotently() {
        let client = create_test_client("delete").await;
        client.put("victim.txt", "bye").await.expect("put");

        assert!(client.delete("victim.txt").await.expect("delete"));
        assert_eq!(
            client.file_exists("victim.txt", None).await.expect("head"),
            Some(false)
        );

        // Deleting again still reports success.
        assert!(client.delete("victim.txt").await.expect("delete again"));

        cleanup_bucket(&client).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_check_bucket_existence() {
        let client = create_test_client("bucket").await;
        assert!(client.bucket_exists().await.expect("head bucket"));

        let missing = crate::s3_client("shoal-test-definitely-not-created");
        assert!(!missing.bucket_exists().await.expect("head bucket"));

        cleanup_bucket(&client).await;
    }
}
