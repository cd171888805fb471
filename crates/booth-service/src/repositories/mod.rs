//! Storage collaborators consulted during login.

pub mod events;

pub use events::{EventSecretStore, InMemoryEventSecrets, PgEventSecretStore};
