// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Security Level: JWT Authentication Required
// Route Prefix: /api/*
// Middleware: jwt_auth_middleware puts an AuthUser in the request extensions;
// handlers that guard a resource call require_capability themselves.

pub mod account;       // Login preference of the caller
pub mod categories;    // Category browsing with product counts
pub mod notifications; // Caller's notification inbox
pub mod requests;      // Placeholder resource
pub mod search;        // Cross-entity search
