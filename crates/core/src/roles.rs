//! Role name constants used in JWT claims and RBAC extractors.

/// Back-office staff: full access to the admin surface.
pub const ROLE_ADMIN: &str = "admin";

/// A customer of the agency: access to their own portal resources only.
pub const ROLE_CLIENT: &str = "client";
