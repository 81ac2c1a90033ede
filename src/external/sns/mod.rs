//! Amazon SNS publisher speaking the Query API with SigV4 signing

mod client;
pub mod sigv4;
mod types;

pub use client::SnsPublisher;
pub use types::{Credentials, TopicArn};
