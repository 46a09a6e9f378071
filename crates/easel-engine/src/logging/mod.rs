//! Logging setup.
//!
//! The engine only speaks the `log` facade; this module installs the
//! `env_logger` backend for binaries that want one.

mod init;

pub use init::{LoggingConfig, init_logging};
