//! Core SIGO library (session model, login state machine, portal views, config).

pub mod auth;
pub mod config;
pub mod logging;
pub mod login;
pub mod portal;
pub mod session;
pub mod session_store;
