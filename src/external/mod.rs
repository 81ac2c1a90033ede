//! Outbound integrations: the shared HTTP client and the Amazon SNS publisher

pub mod client;
pub mod sns;

pub use client::{ReqwestTransport, build_http_client};
pub use sns::SnsPublisher;
