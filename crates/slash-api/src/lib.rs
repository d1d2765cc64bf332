pub mod activity;
pub mod auth;
pub mod convert;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod service;
pub mod shortcuts;
