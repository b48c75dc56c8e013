//! Role names carried in the `authorities` claim.

pub const ROLE_USER: &str = "ROLE_USER";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Roles granted to a newly created account.
pub fn default_roles(admin: bool) -> Vec<&'static str> {
    if admin {
        vec![ROLE_USER, ROLE_ADMIN]
    } else {
        vec![ROLE_USER]
    }
}
