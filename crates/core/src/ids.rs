//! Identity allocation.
//!
//! Services mint every id (entities, transfer group ids, audit entries) so
//! that composite rows can be fully built before they reach the storage
//! layer's atomic commit. Uniqueness is the only property callers may rely
//! on; the encoding is an implementation detail.

use uuid::Uuid;

/// Allocates unique string identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Default generator producing hyphenated UUID v4 strings.
#[derive(Debug, Default, Clone)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
