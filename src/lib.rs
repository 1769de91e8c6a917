#[macro_use]
mod macros;

pub mod client;
pub mod command;
pub mod response;
pub mod status;
pub mod transport;

#[cfg(test)]
mod tests;

// Re-export the interpreter and code tables for direct access
pub use command::Command;
pub use response::{ItemOutcome, Reply, ReplyItem, StatusReport};
pub use status::{GatewayErrorCode, MessageStatus};

// Re-export the main client API for easy access
pub use client::{
    BatchSender, ClickatellClient, ClickatellError, ClickatellResult, ClientBuilder,
    Credentials, GatewaySession, MessageSender, TemplateFields,
};
pub use transport::HttpTransport;

/// Error returned by transports.
///
/// Transports are free to fail with anything that implements
/// `std::error::Error`; the client converts the boxed error into a
/// [`ClickatellError`], recovering it unchanged when the transport boxed a
/// `ClickatellError` itself.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// A specialized `Result` type for transport operations.
///
/// # Examples
///
/// ## Sending a Message
///
/// ```rust,no_run
/// use clickatell::{ClientBuilder, Credentials, MessageSender};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut client = ClientBuilder::new(Credentials::new("3412345", "user", "secret"))
///         .from("27820000000")
///         .build()?;
///
///     // Authenticates on first use
///     let message_id = client.send("27999000001", "Hello, World!").await?;
///
///     println!("Message sent with ID: {}", message_id);
///     Ok(())
/// }
/// ```
///
/// ## Bulk Sending with a Template
///
/// ```rust,no_run
/// use clickatell::{BatchSender, ClientBuilder, TemplateFields};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut client = ClientBuilder::from_env()?.build()?;
///
///     let recipients = ["27999000001", "27999000002"];
///     let fields = TemplateFields::positional(["Friday"]);
///     client
///         .send_bulk(&recipients, "Your order ships on #field1#", &fields)
///         .await?;
///
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;
