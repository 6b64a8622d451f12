//! A personal reading tracker: cookie-session authentication over a
//! password-hashed user store, and a shared bookshelf behind it.

pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware_layer;
pub mod models;
pub mod repositories;
pub mod router;
pub mod services;
pub mod session;
pub mod state;
pub mod validation;
