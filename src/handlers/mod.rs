// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer JWT required)
pub mod protected; // JWT authentication required (/habits/*, /goals)
pub mod public; // No authentication required (/auth/*)
