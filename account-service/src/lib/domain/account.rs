pub mod auth_service;
pub mod credentials;
pub mod errors;
pub mod models;
pub mod ports;
pub mod service;
