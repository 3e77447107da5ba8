//! Classifier client: one chat request per ticket

use crate::config::DEFAULT_TEMPERATURE;
use crate::error::PipelineError;
use rootcause_domain::traits::ChatProvider;
use rootcause_domain::{ChatMessage, ChatRequest, TicketRow};
use std::fmt::Display;

/// Sends tickets to a chat provider under a fixed system instruction
pub struct TicketClassifier<P> {
    provider: P,
    system_message: String,
    temperature: f32,
}

impl<P> TicketClassifier<P>
where
    P: ChatProvider,
    P::Error: Display,
{
    /// Create a classifier using the default temperature
    pub fn new(provider: P, system_message: impl Into<String>) -> Self {
        Self {
            provider,
            system_message: system_message.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Override the decoding temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// The underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The request sent for `row`: system instruction, then the ticket
    pub fn build_request(&self, row: &TicketRow) -> ChatRequest {
        ChatRequest::new(
            vec![
                ChatMessage::system(self.system_message.clone()),
                ChatMessage::user(user_prompt(row)),
            ],
            self.temperature,
        )
    }

    /// Classify one ticket, returning the provider's text unmodified
    pub fn classify(&self, row: &TicketRow) -> Result<String, PipelineError> {
        self.provider
            .chat(&self.build_request(row))
            .map_err(|e| PipelineError::Classification {
                number: row.number.clone(),
                message: e.to_string(),
            })
    }
}

/// The user message describing a ticket
pub fn user_prompt(row: &TicketRow) -> String {
    format!(
        "Ticket Number: {}\nText Exchange: {}\nResolution Note: {}",
        row.number, row.transcript, row.resolution
    )
}
