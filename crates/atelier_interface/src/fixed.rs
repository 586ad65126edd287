//! Fixed in-memory collaborator implementations.
//!
//! Used by tests and by relaxed/offline deployments. These replace the
//! source system's environment-flag auth bypass and hardcoded fallback user
//! ids with injected strategies.

use crate::{ClientDirectory, IdentityProvider, OwnerDirectory};
use async_trait::async_trait;
use atelier_core::{Client, Identity, Owner, Role};
use atelier_error::AtelierResult;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Identity provider that always answers with one fixed identity.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    identity: Identity,
}

impl StaticIdentity {
    /// Fix the provider to the given identity.
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    /// Convenience constructor for an admin caller.
    pub fn admin(user_id: Uuid) -> Self {
        Self::new(Identity {
            user_id,
            role: Role::Admin,
        })
    }

    /// Convenience constructor for a member caller.
    pub fn member(user_id: Uuid) -> Self {
        Self::new(Identity {
            user_id,
            role: Role::Member,
        })
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current(&self) -> AtelierResult<Identity> {
        Ok(self.identity)
    }
}

/// Client directory backed by a fixed set of clients.
#[derive(Debug, Default)]
pub struct StaticClientDirectory {
    by_slug: HashMap<String, Uuid>,
    by_id: HashMap<Uuid, String>,
}

impl StaticClientDirectory {
    /// Build the directory from known clients.
    pub fn new(clients: impl IntoIterator<Item = Client>) -> Self {
        let mut by_slug = HashMap::new();
        let mut by_id = HashMap::new();
        for client in clients {
            let slug = client.slug.to_lowercase();
            by_slug.insert(slug.clone(), client.id);
            by_id.insert(client.id, slug);
        }
        Self { by_slug, by_id }
    }
}

#[async_trait]
impl ClientDirectory for StaticClientDirectory {
    async fn resolve_slug(&self, slug: &str) -> AtelierResult<Option<Uuid>> {
        Ok(self.by_slug.get(&slug.to_lowercase()).copied())
    }

    async fn slug_of(&self, id: Uuid) -> AtelierResult<Option<String>> {
        Ok(self.by_id.get(&id).cloned())
    }

    async fn exists(&self, id: Uuid) -> AtelierResult<bool> {
        Ok(self.by_id.contains_key(&id))
    }
}

/// Owner directory backed by a fixed set plus a designated fallback.
#[derive(Debug)]
pub struct StaticOwnerDirectory {
    owners: RwLock<HashMap<Uuid, Owner>>,
    fallback_id: Uuid,
}

impl StaticOwnerDirectory {
    /// Build the directory from known owners and a fallback id.
    ///
    /// The fallback owner is not registered until `ensure_fallback` is
    /// first called.
    pub fn new(owners: impl IntoIterator<Item = Owner>, fallback_id: Uuid) -> Self {
        let owners = owners.into_iter().map(|o| (o.id, o)).collect();
        Self {
            owners: RwLock::new(owners),
            fallback_id,
        }
    }

    /// The designated fallback owner id.
    pub fn fallback_id(&self) -> Uuid {
        self.fallback_id
    }
}

#[async_trait]
impl OwnerDirectory for StaticOwnerDirectory {
    async fn exists(&self, id: Uuid) -> AtelierResult<bool> {
        Ok(self.owners.read().expect("owner directory poisoned").contains_key(&id))
    }

    async fn ensure_fallback(&self) -> AtelierResult<Uuid> {
        let mut owners = self.owners.write().expect("owner directory poisoned");
        owners.entry(self.fallback_id).or_insert_with(|| {
            tracing::info!(owner_id = %self.fallback_id, "Creating fallback owner");
            Owner {
                id: self.fallback_id,
                display_name: "system-fallback".to_string(),
            }
        });
        Ok(self.fallback_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn slug_resolution_is_case_insensitive() {
        let id = Uuid::new_v4();
        let directory = StaticClientDirectory::new([Client::new(id, "Acme-Media", "Acme")]);

        assert_eq!(directory.resolve_slug("acme-media").await.unwrap(), Some(id));
        assert_eq!(directory.resolve_slug("ACME-MEDIA").await.unwrap(), Some(id));
        assert_eq!(directory.resolve_slug("unknown").await.unwrap(), None);
    }

    #[tokio::test]
    async fn fallback_owner_is_created_once_and_reused() {
        let fallback = Uuid::new_v4();
        let directory = StaticOwnerDirectory::new(Vec::new(), fallback);

        assert!(!directory.exists(fallback).await.unwrap());
        assert_eq!(directory.ensure_fallback().await.unwrap(), fallback);
        assert!(directory.exists(fallback).await.unwrap());
        assert_eq!(directory.ensure_fallback().await.unwrap(), fallback);
    }
}
