// Identifier generation

use uuid::Uuid;

/// Generate a fresh record identifier
///
/// Random (v4) UUIDs come from the OS CSPRNG, so collisions are not a practical concern.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
