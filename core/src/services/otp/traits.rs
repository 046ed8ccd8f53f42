//! Traits for the delivery integration

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which half of the identity pair a code is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Mobile,
    Email,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Mobile => write!(f, "mobile"),
            ChannelKind::Email => write!(f, "email"),
        }
    }
}

/// Trait for code delivery integration (SMS gateway, mailer, console)
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Hand one code to its destination. Failures are reported, never retried.
    async fn notify(&self, channel: ChannelKind, destination: &str, code: &str) -> Result<(), String>;
    /// Name of the provider for logs
    fn provider_name(&self) -> &str;
}
