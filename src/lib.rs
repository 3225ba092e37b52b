pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod roster;
pub mod scoring;
pub mod simulator;
pub mod workers;
