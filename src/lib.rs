//! efs-notify library
//!
//! Best-effort EFS backup status notifications over Amazon SNS and anonymous
//! usage metrics over HTTP.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod notify;

pub use notify::Notifier;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
