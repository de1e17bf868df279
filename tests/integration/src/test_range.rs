//! Ranged and streaming read integration tests.

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use crate::{cleanup_bucket, create_test_client};

    const CONTENT: &str = "This is a test for streaming";

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_stream_exclusive_byte_range() {
        let client = create_test_client("range").await;
        client.put("stream.txt", CONTENT).await.expect("put");

        // range_to is exclusive: [0, 7) streams exactly the first 7 bytes.
        let response = client
            .get_response("stream.txt", false, 0, 7, None)
            .await
            .expect("get_response");
        assert_eq!(response.status().as_u16(), 206);

        let mut collected = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            collected.extend_from_slice(&chunk.expect("chunk"));
        }
        assert_eq!(collected, b"This is");

        cleanup_bucket(&client).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_stream_interior_range() {
        let client = create_test_client("range-mid").await;
        client.put("stream.txt", CONTENT).await.expect("put");

        let response = client
            .get_response("stream.txt", false, 10, 14, None)
            .await
            .expect("get_response");
        let body = response.bytes().await.expect("body");
        assert_eq!(&body[..], b"test");

        cleanup_bucket(&client).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_stream_whole_file_when_requested() {
        let client = create_test_client("range-whole").await;
        client.put("stream.txt", CONTENT).await.expect("put");

        let response = client
            .get_response("stream.txt", true, 0, 0, None)
            .await
            .expect("get_response");
        assert_eq!(response.status().as_u16(), 200);
        let body = response.text().await.expect("body");
        assert_eq!(body, CONTENT);

        cleanup_bucket(&client).await;
    }
}
