pub mod eventbridge;

use crate::{
    error::Result,
    models::events::{EventDetail, OutboundEvent},
};
use async_trait::async_trait;

pub use eventbridge::EventBridgePublisher;

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: OutboundEvent) -> Result<()>;
}

/// Serializes a typed detail and publishes it.
pub async fn publish_detail<T: EventDetail + Sync>(
    publisher: &dyn EventPublisher,
    detail: &T,
) -> Result<OutboundEvent> {
    let event = OutboundEvent::from_detail(detail)?;
    publisher.publish(event.clone()).await?;
    log::info!("Published {} event from {}", event.detail_type, event.source);
    Ok(event)
}
