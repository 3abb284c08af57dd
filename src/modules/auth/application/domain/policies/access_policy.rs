use crate::auth::application::domain::entities::{Actor, UserRole};

/// Whether a request only reads state or changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl Access {
    /// GET, HEAD and OPTIONS are safe; every other verb writes.
    pub fn for_method(method: &str) -> Self {
        match method {
            "GET" | "HEAD" | "OPTIONS" => Access::Read,
            _ => Access::Write,
        }
    }

    pub fn is_safe(&self) -> bool {
        matches!(self, Access::Read)
    }
}

/// What a policy needs to know about the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub role: UserRole,
    pub is_superuser: bool,
}

impl From<&Actor> for Principal {
    fn from(actor: &Actor) -> Self {
        Self {
            role: actor.role,
            is_superuser: actor.is_superuser,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Denial {
    #[error("Authentication credentials were not provided")]
    Unauthenticated,

    #[error("You do not have permission to perform this action")]
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Safe methods for everyone, writes for admins.
    ReadOpenWriteAdmin,
    /// Admins and superusers only, for every method.
    AdminOnly,
    /// Safe methods for everyone, writes for the author or staff.
    ReadOpenWriteAuthorOrStaff,
    /// Any authenticated caller.
    Authenticated,
}

impl Policy {
    /// Collection-level decision, taken before any resource is loaded.
    pub fn has_permission(&self, access: Access, principal: Option<&Principal>) -> bool {
        match self {
            Policy::ReadOpenWriteAdmin => {
                access.is_safe() || principal.is_some_and(|p| p.role.is_admin())
            }
            Policy::AdminOnly => principal.is_some_and(|p| p.role.is_admin() || p.is_superuser),
            Policy::ReadOpenWriteAuthorOrStaff => access.is_safe() || principal.is_some(),
            Policy::Authenticated => principal.is_some(),
        }
    }

    /// Instance-level decision, taken once the resource is resolved.
    pub fn has_object_permission(
        &self,
        access: Access,
        principal: Option<&Principal>,
        is_owner: bool,
    ) -> bool {
        match self {
            Policy::ReadOpenWriteAuthorOrStaff => {
                access.is_safe()
                    || is_owner
                    || principal.is_some_and(|p| p.role.is_admin() || p.role.is_moderator())
            }
            Policy::ReadOpenWriteAdmin | Policy::AdminOnly | Policy::Authenticated => true,
        }
    }

    pub fn check(&self, access: Access, principal: Option<&Principal>) -> Result<(), Denial> {
        if self.has_permission(access, principal) {
            Ok(())
        } else {
            Err(Self::denial(principal))
        }
    }

    /// Runs both phases; the object phase only when the collection phase passes.
    pub fn check_object(
        &self,
        access: Access,
        principal: Option<&Principal>,
        is_owner: bool,
    ) -> Result<(), Denial> {
        self.check(access, principal)?;
        if self.has_object_permission(access, principal, is_owner) {
            Ok(())
        } else {
            Err(Self::denial(principal))
        }
    }

    fn denial(principal: Option<&Principal>) -> Denial {
        match principal {
            Some(_) => Denial::Forbidden,
            None => Denial::Unauthenticated,
        }
    }
}
