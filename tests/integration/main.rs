mod common;
mod health_test;
mod proxy_test;
