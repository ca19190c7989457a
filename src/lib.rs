pub mod auth;
pub mod booking;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod payments;
pub mod store;
