/// Router Module Index
///
/// Navigation endpoints split by access tier. Each tier's protection is applied
/// as a layer or extractor at the module level, never left to individual callers.

/// Routes open to anyone; the gate itself decides what an anonymous caller sees.
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
/// Requires an authenticated session.
pub mod authenticated;

/// Routes restricted to the `administrator` effective role.
pub mod admin;
