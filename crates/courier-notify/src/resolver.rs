//! Audience resolution: addressing mode → concrete recipient set.
//!
//! Resolution is a read-only query against the external user directory and
//! must never mutate notification state. A directory failure fails the
//! whole resolution rather than delivering to an arbitrary subset.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use courier_core::{Audience, Error, Recipient, Result, UserDirectory};

/// Resolves an [`Audience`] into a deduplicated recipient set.
#[derive(Clone)]
pub struct AudienceResolver {
    directory: Arc<dyn UserDirectory>,
}

impl AudienceResolver {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// Resolve the audience, preserving directory order and dropping
    /// duplicates. An empty result is valid (the fan-out becomes a no-op).
    pub async fn resolve(&self, audience: &Audience) -> Result<Vec<Recipient>> {
        let (tenant_id, user_ids) = match audience {
            Audience::Direct { tenant_id, user_id } => (*tenant_id, vec![*user_id]),
            Audience::Tenant { tenant_id } => {
                let users = self
                    .directory
                    .list_user_ids_in_tenant(*tenant_id)
                    .await
                    .map_err(|e| Error::AudienceResolution(e.to_string()))?;
                (*tenant_id, users)
            }
            Audience::Role { tenant_id, role } => {
                let users = self
                    .directory
                    .list_user_ids_by_role(*tenant_id, *role)
                    .await
                    .map_err(|e| Error::AudienceResolution(e.to_string()))?;
                (*tenant_id, users)
            }
        };

        let mut seen = HashSet::with_capacity(user_ids.len());
        let recipients: Vec<Recipient> = user_ids
            .into_iter()
            .filter(|user_id| seen.insert(*user_id))
            .map(|user_id| Recipient { tenant_id, user_id })
            .collect();

        debug!(
            %tenant_id,
            mode = audience.mode(),
            recipient_count = recipients.len(),
            "Resolved audience"
        );
        Ok(recipients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use courier_core::UserRole;
    use uuid::Uuid;

    /// Directory fixture with a fixed tenant roster and per-role buckets.
    struct StaticDirectory {
        tenant_id: Uuid,
        members: Vec<Uuid>,
        agents: Vec<Uuid>,
        fail: bool,
    }

    #[async_trait]
    impl UserDirectory for StaticDirectory {
        async fn list_user_ids_in_tenant(&self, tenant_id: Uuid) -> Result<Vec<Uuid>> {
            if self.fail {
                return Err(Error::Internal("directory offline".to_string()));
            }
            Ok(if tenant_id == self.tenant_id {
                self.members.clone()
            } else {
                Vec::new()
            })
        }

        async fn list_user_ids_by_role(
            &self,
            tenant_id: Uuid,
            role: UserRole,
        ) -> Result<Vec<Uuid>> {
            if self.fail {
                return Err(Error::Internal("directory offline".to_string()));
            }
            Ok(if tenant_id == self.tenant_id && role == UserRole::Agent {
                self.agents.clone()
            } else {
                Vec::new()
            })
        }
    }

    #[tokio::test]
    async fn test_direct_resolves_without_directory() {
        let tenant = Uuid::new_v4();
        let user = Uuid::new_v4();
        // A failing directory must not matter for direct addressing
        let resolver = AudienceResolver::new(Arc::new(StaticDirectory {
            tenant_id: tenant,
            members: vec![],
            agents: vec![],
            fail: true,
        }));

        let recipients = resolver
            .resolve(&Audience::Direct {
                tenant_id: tenant,
                user_id: user,
            })
            .await
            .unwrap();
        assert_eq!(
            recipients,
            vec![Recipient {
                tenant_id: tenant,
                user_id: user
            }]
        );
    }

    #[tokio::test]
    async fn test_tenant_resolves_all_members() {
        let tenant = Uuid::new_v4();
        let members = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let resolver = AudienceResolver::new(Arc::new(StaticDirectory {
            tenant_id: tenant,
            members: members.clone(),
            agents: vec![],
            fail: false,
        }));

        let recipients = resolver
            .resolve(&Audience::Tenant { tenant_id: tenant })
            .await
            .unwrap();
        assert_eq!(recipients.len(), 3);
        assert!(recipients.iter().all(|r| r.tenant_id == tenant));
        let users: Vec<Uuid> = recipients.iter().map(|r| r.user_id).collect();
        assert_eq!(users, members);
    }

    #[tokio::test]
    async fn test_role_resolves_only_role_holders() {
        let tenant = Uuid::new_v4();
        let agents = vec![Uuid::new_v4(), Uuid::new_v4()];
        let resolver = AudienceResolver::new(Arc::new(StaticDirectory {
            tenant_id: tenant,
            members: vec![Uuid::new_v4(); 5],
            agents: agents.clone(),
            fail: false,
        }));

        let recipients = resolver
            .resolve(&Audience::Role {
                tenant_id: tenant,
                role: UserRole::Agent,
            })
            .await
            .unwrap();
        assert_eq!(
            recipients.iter().map(|r| r.user_id).collect::<Vec<_>>(),
            agents
        );

        let viewers = resolver
            .resolve(&Audience::Role {
                tenant_id: tenant,
                role: UserRole::Viewer,
            })
            .await
            .unwrap();
        assert!(viewers.is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_are_dropped_preserving_order() {
        let tenant = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let resolver = AudienceResolver::new(Arc::new(StaticDirectory {
            tenant_id: tenant,
            members: vec![a, b, a, b, a],
            agents: vec![],
            fail: false,
        }));

        let recipients = resolver
            .resolve(&Audience::Tenant { tenant_id: tenant })
            .await
            .unwrap();
        assert_eq!(
            recipients.iter().map(|r| r.user_id).collect::<Vec<_>>(),
            vec![a, b]
        );
    }

    #[tokio::test]
    async fn test_directory_failure_is_atomic() {
        let tenant = Uuid::new_v4();
        let resolver = AudienceResolver::new(Arc::new(StaticDirectory {
            tenant_id: tenant,
            members: vec![Uuid::new_v4()],
            agents: vec![],
            fail: true,
        }));

        let err = resolver
            .resolve(&Audience::Tenant { tenant_id: tenant })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AudienceResolution(_)));
    }

    #[tokio::test]
    async fn test_empty_audience_is_valid() {
        let tenant = Uuid::new_v4();
        let resolver = AudienceResolver::new(Arc::new(StaticDirectory {
            tenant_id: tenant,
            members: vec![],
            agents: vec![],
            fail: false,
        }));

        let recipients = resolver
            .resolve(&Audience::Tenant { tenant_id: tenant })
            .await
            .unwrap();
        assert!(recipients.is_empty());
    }
}
