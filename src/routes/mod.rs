/// Router Module Index
///
/// Splits the API by access level. Protection is applied to a whole router
/// with a route layer in `create_router`, never per handler.

/// Routes accessible to anonymous visitors: content reads, the contact form, login.
pub mod public;

/// Routes behind the Access Gate (`AuthAdmin`).
pub mod admin;
