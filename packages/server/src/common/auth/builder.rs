use super::{AuthError, Capability, Role};

/// Entry point for authorization checks
///
/// Usage:
/// ```
/// use movielab_core::common::auth::{Caller, Capability, Role};
///
/// Caller::new("alice", Role::Admin)
///     .can(Capability::ManageCatalog)
///     .check()
///     .unwrap();
/// ```
pub struct Caller<'a> {
    username: &'a str,
    role: Role,
}

impl<'a> Caller<'a> {
    /// Create a caller from an already verified token
    pub fn new(username: &'a str, role: Role) -> Self {
        Self { username, role }
    }

    /// Specify what capability the caller needs
    pub fn can(self, capability: Capability) -> CapabilityCheck<'a> {
        CapabilityCheck {
            caller: self,
            capability,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityCheck<'a> {
    caller: Caller<'a>,
    capability: Capability,
}

impl CapabilityCheck<'_> {
    /// Perform the authorization check
    pub fn check(self) -> Result<(), AuthError> {
        let Some(required) = self.capability.required_role() else {
            return Ok(());
        };

        if self.caller.role.satisfies(required) {
            return Ok(());
        }

        tracing::warn!(
            username = self.caller.username,
            role = %self.caller.role,
            capability = ?self.capability,
            "Insufficient permissions"
        );
        Err(AuthError::InsufficientRole {
            required,
            actual: self.caller.role,
        })
    }
}
