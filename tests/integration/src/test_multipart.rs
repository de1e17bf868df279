//! Multipart upload integration tests.

#[cfg(test)]
mod tests {
    use crate::{cleanup_bucket, create_test_client};

    /// S3's minimum size for every part except the last.
    const PART_SIZE: usize = 5 * 1024 * 1024;

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_complete_three_part_upload() {
        let client = create_test_client("mpu").await;

        let session = client
            .create_multipart_upload("big.bin", Some("application/octet-stream"))
            .await
            .expect("create_multipart_upload");
        assert!(!session.upload_id.is_empty());

        // Parts may be uploaded in any order; upload 2, 3, 1.
        let mut parts = Vec::new();
        for part_number in [2, 3, 1] {
            let data = vec![part_number as u8; PART_SIZE];
            let part = client
                .upload_part("big.bin", data, &session.upload_id, part_number)
                .await
                .unwrap_or_else(|e| panic!("upload part {part_number}: {e}"));
            assert_eq!(part.part_number, part_number);
            assert!(!part.etag.is_empty());
            parts.push(part);
        }

        let completed = client
            .complete_multipart_upload("big.bin", &session.upload_id, &parts)
            .await
            .expect("complete_multipart_upload");
        assert!(completed.etag.is_some(), "completed upload should have etag");

        // The assembled object is the sum of the three parts.
        let length = client.get_content_length("big.bin").await.expect("head");
        assert_eq!(length, Some(3 * PART_SIZE as u64));

        cleanup_bucket(&client).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_fail_complete_after_abort() {
        let client = create_test_client("abort").await;

        let session = client
            .create_multipart_upload("aborted.bin", None)
            .await
            .expect("create");

        let part = client
            .upload_part(
                "aborted.bin",
                vec![0xABu8; PART_SIZE],
                &session.upload_id,
                1,
            )
            .await
            .expect("upload part");

        client
            .abort_multipart_upload("aborted.bin", &session.upload_id)
            .await
            .expect("abort");

        // Completing a dead session is a protocol error, not a sentinel.
        let result = client
            .complete_multipart_upload("aborted.bin", &session.upload_id, &[part])
            .await;
        assert!(
            matches!(result, Err(shoal_s3::S3ClientError::Protocol { .. })),
            "expected protocol error, got {result:?}"
        );

        // And the key must not exist.
        assert_eq!(
            client.file_exists("aborted.bin", None).await.expect("head"),
            Some(false)
        );

        cleanup_bucket(&client).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_in_flight_uploads() {
        let client = create_test_client("mpu-list").await;

        let session = client
            .create_multipart_upload("pending.bin", None)
            .await
            .expect("create");

        let uploads = client
            .list_multipart_uploads(None, None)
            .await
            .expect("list uploads");
        assert!(
            uploads
                .iter()
                .any(|u| u.key == "pending.bin" && u.upload_id == session.upload_id),
            "in-flight upload should be listed: {uploads:?}"
        );

        client
            .abort_multipart_upload("pending.bin", &session.upload_id)
            .await
            .expect("abort");

        cleanup_bucket(&client).await;
    }
}
