use sqlx::PgPool;
use std::time::Duration;
use tracing::{error, info};

use crate::db::subscriptions;

/// Background job that marks subscriptions past their end date as completed
pub async fn start_subscription_completion_checker(pool: PgPool) {
    info!("Starting subscription completion checker background job");

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600)); // Run every hour

        loop {
            interval.tick().await;

            match subscriptions::complete_expired_subscriptions(&pool).await {
                Ok(0) => {}
                Ok(completed) => info!("Completed {} subscription(s)", completed),
                Err(e) => error!("Failed to check expired subscriptions: {}", e),
            }
        }
    });
}
