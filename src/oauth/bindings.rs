// Lookup of local accounts bound to third-party openids
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Resolves a third-party identity to a local user id
#[async_trait]
pub trait AccountBindings: Send + Sync {
    /// Local uid bound to `openid` under `provider_code`, if any
    async fn find_uid(&self, provider_code: u8, openid: &str) -> Option<String>;
}

/// Process-local bindings, for development and tests
#[derive(Debug, Default)]
pub struct InMemoryAccountBindings {
    bindings: RwLock<HashMap<(u8, String), String>>,
}

impl InMemoryAccountBindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `openid` to `uid`, returning the previous uid if it was bound
    pub async fn bind(&self, provider_code: u8, openid: &str, uid: &str) -> Option<String> {
        self.bindings
            .write()
            .await
            .insert((provider_code, openid.to_string()), uid.to_string())
    }
}

#[async_trait]
impl AccountBindings for InMemoryAccountBindings {
    async fn find_uid(&self, provider_code: u8, openid: &str) -> Option<String> {
        self.bindings
            .read()
            .await
            .get(&(provider_code, openid.to_string()))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_and_find() {
        let bindings = InMemoryAccountBindings::new();
        assert!(bindings.find_uid(3, "octocat").await.is_none());

        assert!(bindings.bind(3, "octocat", "1001").await.is_none());
        assert_eq!(bindings.find_uid(3, "octocat").await, Some("1001".to_string()));

        // Same openid under another provider is a different identity
        assert!(bindings.find_uid(9, "octocat").await.is_none());
    }

    #[tokio::test]
    async fn test_rebind() {
        let bindings = InMemoryAccountBindings::new();
        bindings.bind(4, "ABC", "1").await;

        assert_eq!(bindings.bind(4, "ABC", "2").await, Some("1".to_string()));
        assert_eq!(bindings.find_uid(4, "ABC").await, Some("2".to_string()));
    }
}
