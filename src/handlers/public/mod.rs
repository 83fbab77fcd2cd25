// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition endpoints. Every input is untrusted, so bodies are
// validated before anything touches storage.

pub mod auth;
