//! HTTP views, one module per API area
//!
//! Every view has the shape `async fn(AppState, Request) -> Result<Response>`
//! and is bound to its route in [`crate::urls`].

pub mod auth;
pub mod auto_post;
pub mod health;
pub mod posts;
pub mod public;
pub mod settings;
pub mod topics;
