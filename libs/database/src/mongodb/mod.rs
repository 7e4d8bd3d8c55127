//! MongoDB connector and health checks.

mod connector;
mod health;

pub use connector::{
    connect, connect_from_config, connect_from_config_with_retry, connect_with_retry, MongoError,
};
pub use health::check_health;

// Re-export driver types for convenience
pub use mongodb::{Client, Collection, Database};
