pub mod core;
pub mod db;
pub mod gazoduc_web_server;
pub mod jobs;
pub mod models;
pub mod routes;
pub mod services;
