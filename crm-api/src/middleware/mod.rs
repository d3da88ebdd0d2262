/// Middleware for the API server
///
/// Role checks live in `crm_shared::auth::guard`; this module holds the
/// HTTP-level layers that apply to every response.

pub mod security;
