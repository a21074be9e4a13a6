pub mod api;
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
