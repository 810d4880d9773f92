//! In-memory testing for Genesis applications.
//!
//! [`TestClient`] feeds requests directly into an
//! [`App`](genesis_server::App), so tests exercise routing, argument
//! binding, endpoint filters and handlers without binding a port.
//!
//! ```ignore
//! use genesis_test::TestClient;
//! use http::StatusCode;
//!
//! #[tokio::test]
//! async fn test_echo() {
//!     let client = TestClient::new(app());
//!
//!     client
//!         .get("/api/echo?message=hello")
//!         .send()
//!         .await
//!         .assert_status(StatusCode::OK)
//!         .assert_text("hello");
//!
//!     let response = client.post("/api/echo").json("hello").send().await;
//!     assert_eq!(response.text().unwrap(), "hello");
//! }
//! ```

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, TestClientRequest};
pub use error::TestError;
pub use request::TestRequestBuilder;
pub use response::TestResponse;
