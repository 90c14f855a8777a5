pub mod auth;
pub mod health;
pub mod metrics;
pub mod module_info;
pub mod request_id;
pub mod users;
