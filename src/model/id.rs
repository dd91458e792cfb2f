use uuid::Uuid;

/// Namespace used for top-level entities (`TestResults`)
pub const ROOT_NAMESPACE: Uuid = Uuid::nil();

/// Derive a stable ID for `name` inside the `namespace` ID
///
/// This is a UUIDv5 (SHA-1 namespaced hash): the same namespace and name
/// always produce the same ID, in any process.
pub fn derive_id(namespace: &Uuid, name: &str) -> Uuid {
    Uuid::new_v5(namespace, name.as_bytes())
}
