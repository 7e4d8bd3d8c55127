use mongodb::{bson::doc, Client};
use tracing::debug;

/// Check MongoDB connectivity with a ping against the admin database.
///
/// Returns `true` when the server responds, `false` otherwise. Never errors:
/// readiness probes want a boolean, not a failure to classify.
pub async fn check_health(client: &Client) -> bool {
    match client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
    {
        Ok(_) => true,
        Err(e) => {
            debug!("MongoDB health check failed: {}", e);
            false
        }
    }
}
