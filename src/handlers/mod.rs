// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (JWT auth, capability checks per route)

pub mod public;    // Index and health probe
pub mod protected; // Everything under /api/*
