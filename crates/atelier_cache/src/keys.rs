//! Cache key construction.
//!
//! Two key spaces: single-record lookups and client-scoped list queries.
//! Every mutating operation invalidates the record key and the client's
//! list prefix, so invalidation never has to enumerate filter signatures.

use uuid::Uuid;

/// Key for a single-record lookup.
pub fn asset_key(id: Uuid, client_id: Uuid) -> String {
    format!("asset:{}:{}", id, client_id)
}

/// Key for a list query, suffixed by the canonical filter signature.
pub fn list_key(client_id: Uuid, filter_signature: &str) -> String {
    format!("assets:{}:{}", client_id, filter_signature)
}

/// Prefix covering every list query cached for one client.
pub fn client_list_prefix(client_id: Uuid) -> String {
    format!("assets:{}:", client_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_keys_fall_under_the_client_prefix() {
        let client = Uuid::new_v4();
        let key = list_key(client, "type=image&limit=20");
        assert!(key.starts_with(&client_list_prefix(client)));
    }

    #[test]
    fn different_clients_never_share_a_prefix() {
        let a = client_list_prefix(Uuid::new_v4());
        let b = client_list_prefix(Uuid::new_v4());
        assert_ne!(a, b);
    }
}
