//! HTTP route handlers.
//!
//! Each sub-module corresponds to an API endpoint group. The [`videos`]
//! handlers require authentication via the [`crate::auth::require_api_key`]
//! middleware; [`root`] and [`health`] are public.

pub mod health;
pub mod root;
pub mod videos;
