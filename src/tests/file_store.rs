#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use crate::cache::token::Token;
    use crate::config::settings::PreludeConfig;
    use crate::config::store::{ConfigStore, FileConfigStore};
    use crate::helpers::time::now_u64;

    fn prelude_config() -> PreludeConfig {
        PreludeConfig::new("https://prelude.local", "glpi", "secret")
    }

    #[tokio::test]
    async fn token_is_persisted_and_restored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("token.json");

        let store = FileConfigStore::open(prelude_config(), &path).await;
        assert_eq!(store.get_current_access_token().await, None);
        store
            .store_access_token(Token::from_expires_in("persisted".into(), 3600, 10))
            .await
            .unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());

        let reopened = FileConfigStore::open(prelude_config(), &path).await;
        assert_eq!(reopened.get_current_access_token().await.as_deref(), Some("persisted"));
        assert_eq!(reopened.get_config().await.unwrap(), prelude_config());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let store = FileConfigStore::open(prelude_config(), &path).await;
        store
            .store_access_token(Token::from_expires_in("secret".into(), 3600, 10))
            .await
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "permissions mismatch (expected 0600)");
    }

    #[tokio::test]
    async fn expired_or_corrupt_state_is_ignored() {
        let dir = tempfile::tempdir().unwrap();

        let expired_path = dir.path().join("expired.json");
        let past = now_u64() - 60;
        fs::write(&expired_path, serde_json::to_vec(&Token::new("old".into(), past, past)).unwrap()).unwrap();
        let store = FileConfigStore::open(prelude_config(), &expired_path).await;
        assert_eq!(store.get_current_access_token().await, None);

        let corrupt_path = dir.path().join("corrupt.json");
        fs::write(&corrupt_path, "{not json").unwrap();
        let store = FileConfigStore::open(prelude_config(), &corrupt_path).await;
        assert_eq!(store.get_current_access_token().await, None);
        assert_eq!(store.path(), corrupt_path.as_path());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writes_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let store = Arc::new(FileConfigStore::open(prelude_config(), &path).await);

        for round in 0..20 {
            let writers: Vec<_> = (0..4)
                .map(|i| {
                    let store = store.clone();
                    tokio::spawn(async move {
                        let token = Token::from_expires_in(format!("tok-{}-{}", round, i), 3600, 10);
                        store.store_access_token(token).await
                    })
                })
                .collect();
            for writer in writers {
                writer.await.unwrap().unwrap();
            }
        }

        let restored = FileConfigStore::open(prelude_config(), &path).await;
        assert!(restored.get_current_access_token().await.unwrap().starts_with("tok-19-"));
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temp files must not be left behind");
    }

    #[tokio::test]
    async fn unwritable_state_path_keeps_token_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        // parent is a regular file, so the state directory cannot be created
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let path = blocker.join("token.json");

        let store = FileConfigStore::open(prelude_config(), &path).await;
        store
            .store_access_token(Token::from_expires_in("in-memory".into(), 3600, 10))
            .await
            .unwrap();

        assert_eq!(store.get_current_access_token().await.as_deref(), Some("in-memory"));
        assert!(!path.exists());
    }
}
