//! HTTP-level integration tests against a fake explorer backend.

pub mod fake_backend;
pub mod headless_http_test;
pub mod http_client_test;
