pub mod config;
pub mod jwt_auth;
pub mod redis_helper;
mod responses;
mod telemetry;

pub use self::config::AppConfig;
pub use redis_helper::*;
pub use responses::*;
pub use telemetry::*;
