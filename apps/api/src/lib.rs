pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod editor;
pub mod errors;
pub mod models;
pub mod resumes;
pub mod routes;
pub mod state;
