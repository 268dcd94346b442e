pub mod archive_builder;
pub mod http_stub;
pub mod log_capture;
pub mod mock_release_client;
