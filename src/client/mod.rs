// ABOUTME: Clickatell client module providing trait-based interfaces over the HTTP gateway
// ABOUTME: Exports all client components including traits, builders, error types, and default implementation

//! Clickatell Client Module
//!
//! This module provides a trait-based client for the Clickatell HTTP API
//! with the following features:
//!
//! * **Native async traits** - Uses Rust 1.75+ async fn in traits (no async_trait dependency)
//! * **Layered design** - Separate traits for the transport, session, single and batch messaging
//! * **Session handling** - Authenticates on demand and renews an expired session once per call
//! * **Builder patterns** - Easy client creation with sensible defaults
//! * **Keep-alive support** - Pings idle sessions before the gateway expires them
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clickatell::client::{ClientBuilder, MessageSender};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = ClientBuilder::quick("3412345", "user", "secret")?;
//!
//! let message_id = client.send("27999000001", "Hello!").await?;
//! let report = client.query(&message_id).await?;
//! println!("{message_id}: {:?}", report.status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Batch Messaging
//!
//! ```rust,no_run
//! use clickatell::client::{BatchSender, ClientBuilder, TemplateFields};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = ClientBuilder::quick("3412345", "user", "secret")?;
//!
//! let batch_id = client.start_batch("Hi #field1#, see you on #field2#").await?;
//! let fields = TemplateFields::positional(["Alice", "Tuesday"]);
//! let ids = client.send_item(&batch_id, &["27999000001"], &fields).await?;
//! client.quick_send(&batch_id, &["27999000002", "27999000003"]).await?;
//! client.end_batch(&batch_id).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Keep-Alive for Long-Running Applications
//!
//! ```rust,no_run
//! use clickatell::client::{ClientBuilder, GatewaySession};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = ClientBuilder::quick("3412345", "user", "secret")?;
//! client.authenticate(false).await?;
//!
//! loop {
//!     client.maintain_keep_alive().await?;
//!
//!     if client.is_keep_alive_failed() {
//!         println!("Session lost, re-authenticating");
//!         client.authenticate(true).await?;
//!     }
//!
//!     tokio::time::sleep(Duration::from_secs(60)).await;
//! }
//! # }
//! ```
//!
//! ## Architecture
//!
//! * `Transport` - Issues one HTTP GET and returns the body
//! * `GatewaySession` - authenticate, ping, session invalidation
//! * `MessageSender` - send and query single messages (extends GatewaySession)
//! * `BatchSender` - start/send/quick-send/end batches and bulk send (extends GatewaySession)

pub mod builder;
pub mod default;
pub mod error;
pub mod keepalive;
pub mod shared;
pub mod traits;
pub mod types;

// Re-export the main types for easy access
pub use builder::ClientBuilder;
pub use default::ClickatellClient;
pub use error::{ClickatellError, ClickatellResult};
pub use keepalive::{KeepAliveConfig, KeepAliveManager, KeepAliveStatus};
pub use shared::SharedClient;
pub use traits::{BatchSender, GatewaySession, MessageSender, Transport};
pub use types::{ClientConfig, Credentials, GatewayRequest, TemplateFields};
