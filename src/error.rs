use thiserror::Error;

use crate::role::Role;

/// RegistryError
///
/// Configuration defects in the navigation tables. These are caught by
/// `Registry::build` at startup (and by the test suite); a running session
/// never sees one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid path pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Route table for `{0}` has no landing route `/`")]
    MissingLanding(Role),

    #[error("Route table for `{role}` declares `{pattern}` more than once")]
    DuplicateRoute { role: Role, pattern: String },

    #[error("Route table for `{0}` must end with exactly one catch-all")]
    CatchAllPlacement(Role),

    #[error("Menu for `{role}` links to `{pattern}`, which is not routed")]
    UnroutedMenuEntry { role: Role, pattern: String },

    #[error("Menu for `{0}` lists the catch-all")]
    CatchAllInMenu(Role),
}
