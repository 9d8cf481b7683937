//! Data providers: local mock generators and remote HTTP APIs.
//!
//! Providers are constructed explicitly at startup and passed into the
//! server builders; handlers never reach for globals. Only the output
//! shapes are contractual: they are what the widgets render.

pub mod ideate;
pub mod location;
pub mod products;
pub mod properties;
pub mod restaurants;
pub mod vendors;
