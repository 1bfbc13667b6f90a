//! Well-known role name constants.
//!
//! These must match the seed data in `20261001000001_create_roles_table.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EMPLOYEE: &str = "employee";
pub const ROLE_USER: &str = "user";

/// Role id assigned to new accounts at signup.
pub const DEFAULT_ROLE_ID: i16 = 3;

/// Whether the role may moderate reviews (employees and admins).
pub fn is_staff(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_EMPLOYEE
}
