//! Configuration management for bsnap.
//!
//! Selects the date format snapshots are rendered with and the identity
//! stamped on log payloads.
//!
//! # Usage
//!
//! ```rust
//! use bsnap_config::BsnapUserConfig;
//!
//! let config = BsnapUserConfig::from_toml(r#"
//!     [formatter]
//!     date_format = "%Y-%m-%d %H:%M:%S"
//! "#).unwrap();
//!
//! let formatter = config.date_formatter().unwrap();
//! assert_eq!(formatter.pattern(), "%Y-%m-%d %H:%M:%S");
//! ```

pub mod bsnap_config;
pub mod error;
pub mod prelude;

pub use bsnap_config::BsnapUserConfig;
