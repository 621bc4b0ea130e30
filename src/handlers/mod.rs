// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) -> Protected (Auth0 JWT + per-route scope)

pub mod public;    // GET /, GET /health
pub mod protected; // /restaurants/*, /reviews/*
