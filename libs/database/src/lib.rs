//! Database library providing the MongoDB connector and utilities.
//!
//! # Example
//!
//! ```ignore
//! use core_config::{FromEnv, MongoConfig};
//!
//! let config = MongoConfig::from_env()?;
//! let client = database::mongodb::connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;
pub mod mongodb;

pub use common::RetryConfig;
