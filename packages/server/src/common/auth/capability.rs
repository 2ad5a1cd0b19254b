use super::Role;

/// Operations the authorization gate knows about.
///
/// Each route declares exactly one capability; the gate consults
/// [`Capability::required_role`] once per request. Handlers never compare
/// roles themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// List, get and search movies and actors.
    ReadCatalog,

    /// Create, update and delete movies and actors.
    ManageCatalog,
}

impl Capability {
    /// Role a caller must hold. `None` means any authenticated caller.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Capability::ReadCatalog => None,
            Capability::ManageCatalog => Some(Role::Admin),
        }
    }
}
