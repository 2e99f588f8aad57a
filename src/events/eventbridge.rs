use crate::{
    error::{PipelineError, Result},
    events::EventPublisher,
    logger,
    models::events::OutboundEvent,
};
use async_trait::async_trait;
use aws_sdk_eventbridge::{types::PutEventsRequestEntry, Client};

const SERVICE: &str = "eventbridge";

#[derive(Clone)]
pub struct EventBridgePublisher {
    client: Client,
    event_bus_name: String,
}

impl EventBridgePublisher {
    pub fn new(client: Client, event_bus_name: impl Into<String>) -> Self {
        Self {
            client,
            event_bus_name: event_bus_name.into(),
        }
    }

    pub fn event_bus_name(&self) -> &str {
        &self.event_bus_name
    }
}

#[async_trait]
impl EventPublisher for EventBridgePublisher {
    async fn publish(&self, event: OutboundEvent) -> Result<()> {
        log::debug!(
            "Putting {} event on bus {}: {}",
            event.detail_type,
            self.event_bus_name,
            event.detail
        );
        let _timer = logger::timer("eventbridge put_events");

        let entry = PutEventsRequestEntry::builder()
            .source(event.source)
            .detail_type(event.detail_type)
            .detail(event.detail)
            .event_bus_name(&self.event_bus_name)
            .build();

        let response = self
            .client
            .put_events()
            .entries(entry)
            .send()
            .await
            .map_err(|e| {
                log::error!("Error putting event to EventBridge: {}", e);
                PipelineError::aws(SERVICE, e)
            })?;

        if response.failed_entry_count() > 0 {
            let reason = response
                .entries()
                .iter()
                .filter_map(|entry| {
                    entry.error_code().map(|code| {
                        format!("{}: {}", code, entry.error_message().unwrap_or_default())
                    })
                })
                .collect::<Vec<_>>()
                .join("; ");
            log::error!("EventBridge rejected the event: {}", reason);
            return Err(PipelineError::aws(
                SERVICE,
                format!("event rejected: {}", reason),
            ));
        }

        Ok(())
    }
}
