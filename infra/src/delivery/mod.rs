//! Delivery module
//!
//! Channels that hand issued codes to their destinations. No real SMS or email
//! transport ships with the service; the console channel stands in for both.

pub mod console;

pub use console::ConsoleDeliveryChannel;
