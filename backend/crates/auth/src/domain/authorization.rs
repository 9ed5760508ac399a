//! Authorization Gate
//!
//! One predicate decides every admin check, both for route gating and for
//! each mutating handler.

use crate::domain::entity::UserProfile;
use crate::domain::value_object::UserRole;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Render `/admin/**`
    ViewAdmin,
    /// Create, update or delete blog posts, services and portfolio items
    ManageContent,
    /// Create, update or delete users and read their activity
    ManageUsers,
}

impl Capability {
    pub const fn permits(self, role: UserRole) -> bool {
        match self {
            Capability::ViewAdmin | Capability::ManageContent | Capability::ManageUsers => {
                role.is_admin()
            }
        }
    }
}

/// `Unauthenticated` without a user, `Forbidden` when the role falls short.
pub fn authorize(user: Option<&UserProfile>, capability: Capability) -> AuthResult<&UserProfile> {
    let user = user.ok_or(AuthError::Unauthenticated)?;
    if capability.permits(user.role) {
        Ok(user)
    } else {
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kernel::id::UserId;

    fn profile(role: UserRole) -> UserProfile {
        UserProfile {
            id: UserId::new(1),
            name: "n".into(),
            email: "n@x.com".into(),
            role,
            profile_image: None,
            bio: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_anonymous_is_unauthenticated() {
        assert!(matches!(
            authorize(None, Capability::ViewAdmin),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn test_only_admin_passes() {
        for cap in [
            Capability::ViewAdmin,
            Capability::ManageContent,
            Capability::ManageUsers,
        ] {
            assert!(authorize(Some(&profile(UserRole::Admin)), cap).is_ok());
            assert!(matches!(
                authorize(Some(&profile(UserRole::Editor)), cap),
                Err(AuthError::Forbidden)
            ));
            assert!(matches!(
                authorize(Some(&profile(UserRole::User)), cap),
                Err(AuthError::Forbidden)
            ));
        }
    }
}
