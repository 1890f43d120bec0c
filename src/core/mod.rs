pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod link;
pub mod models;
