//! Trait seam to the external user directory.
//!
//! The directory owns tenant membership and roles; the notification engine
//! only reads from it during audience resolution. Lookups must not mutate
//! notification state.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::UserRole;

/// Read-only view of the user directory (external collaborator).
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// All user IDs belonging to a tenant.
    async fn list_user_ids_in_tenant(&self, tenant_id: Uuid) -> Result<Vec<Uuid>>;

    /// User IDs in a tenant holding the given role.
    async fn list_user_ids_by_role(&self, tenant_id: Uuid, role: UserRole) -> Result<Vec<Uuid>>;
}
