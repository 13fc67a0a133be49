pub mod mock_backend;
pub mod test_server;
