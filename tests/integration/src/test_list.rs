//! Listing integration tests.

#[cfg(test)]
mod tests {
    use crate::{cleanup_bucket, create_test_client};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_single_match_as_sequence() {
        let client = create_test_client("list-one").await;
        client.put("solo/only.txt", "x").await.expect("put");

        // Exactly one match still comes back as a one-element sequence.
        let entries = client
            .list(Some("/"), Some("solo/"), 1000)
            .await
            .expect("list");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "solo/only.txt");
        assert_eq!(entries[0].size, 1);

        cleanup_bucket(&client).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_list_by_prefix() {
        let client = create_test_client("list-prefix").await;
        client.put("logs/2026/a.log", "aa").await.expect("put");
        client.put("logs/2026/b.log", "bb").await.expect("put");
        client.put("data/c.bin", "cc").await.expect("put");

        let entries = client
            .list(None, Some("logs/"), 1000)
            .await
            .expect("list");
        let mut keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["logs/2026/a.log", "logs/2026/b.log"]);

        cleanup_bucket(&client).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_respect_max_keys() {
        let client = create_test_client("list-cap").await;
        for i in 0..5 {
            client
                .put(&format!("item-{i}.txt"), "x")
                .await
                .expect("put");
        }

        let entries = client.list(None, None, 3).await.expect("list");
        assert_eq!(entries.len(), 3);

        cleanup_bucket(&client).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_empty_listing_for_unmatched_prefix() {
        let client = create_test_client("list-empty").await;

        let entries = client
            .list(None, Some("no-such-prefix/"), 1000)
            .await
            .expect("list");
        assert!(entries.is_empty());

        cleanup_bucket(&client).await;
    }
}
