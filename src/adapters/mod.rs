pub mod health_handler;
pub mod proxy;
pub mod ui_handler;
