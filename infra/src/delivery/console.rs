//! Console delivery channel
//!
//! Development stand-in for SMS and email transports. Prints the code to stdout and
//! emits a structured event with the destination masked. With console output off it
//! only logs, which is the `log` delivery channel.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use otp_core::services::{ChannelKind, DeliveryChannel};
use otp_shared::utils::{mask_email, mask_mobile};

/// Console delivery channel for development and testing
///
/// Counts dispatched messages and can simulate provider failures.
#[derive(Clone)]
pub struct ConsoleDeliveryChannel {
    /// Counter for tracking number of messages dispatched
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: Arc<AtomicBool>,
    /// Whether to print messages to stdout
    console_output: bool,
}

impl ConsoleDeliveryChannel {
    /// Channel that prints to stdout
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    /// Channel that only logs masked events
    pub fn log_only() -> Self {
        Self::with_options(false, false)
    }

    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: Arc::new(AtomicBool::new(simulate_failure)),
            console_output,
        }
    }

    /// Total number of messages dispatched
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    pub fn reset_counter(&self) {
        self.message_count.store(0, Ordering::SeqCst);
    }

    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    fn mask(channel: ChannelKind, destination: &str) -> String {
        match channel {
            ChannelKind::Mobile => mask_mobile(destination),
            ChannelKind::Email => mask_email(destination),
        }
    }
}

impl Default for ConsoleDeliveryChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeliveryChannel for ConsoleDeliveryChannel {
    async fn notify(&self, channel: ChannelKind, destination: &str, code: &str) -> Result<(), String> {
        let masked = Self::mask(channel, destination);

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(
                provider = self.provider_name(),
                channel = %channel,
                destination = %masked,
                "Console delivery simulating failure"
            );
            return Err(format!("Simulated {} delivery failure", channel));
        }

        let message_id = format!("console_{}", Uuid::new_v4().simple());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            let label = match channel {
                ChannelKind::Mobile => "SMS",
                ChannelKind::Email => "EMAIL",
            };
            println!("\n{}", "=".repeat(60));
            println!("OTP DELIVERY ({}) - MESSAGE #{}", label, count);
            println!("{}", "=".repeat(60));
            println!("To: {}", destination);
            println!("Message ID: {}", message_id);
            println!("Code: {}", code);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "otp_delivery",
            provider = self.provider_name(),
            channel = %channel,
            destination = %masked,
            message_id = %message_id,
            "OTP dispatched"
        );

        Ok(())
    }

    fn provider_name(&self) -> &str {
        if self.console_output {
            "console"
        } else {
            "log"
        }
    }
}
