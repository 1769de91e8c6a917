// ABOUTME: Shareable handle around a Clickatell client for use from several tasks
// ABOUTME: Serialises operations so session renewal and the retried request happen under one lock

use crate::client::default::ClickatellClient;
use crate::client::traits::Transport;
use crate::transport::HttpTransport;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Cloneable handle to one client
///
/// The session id and the retry state live in the client, so two tasks must
/// not interleave a re-authentication with each other's requests. Each
/// caller locks the client for the whole operation:
///
/// ```rust,no_run
/// use clickatell::client::{ClientBuilder, MessageSender, SharedClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let shared = SharedClient::new(ClientBuilder::quick("3412345", "user", "secret")?);
///
/// let other = shared.clone();
/// let (first, second) = tokio::join!(
///     async { shared.lock().await.send("27999000001", "Hello").await },
///     async { other.lock().await.send("27999000002", "Hello").await },
/// );
/// println!("{} {}", first?, second?);
/// # Ok(())
/// # }
/// ```
pub struct SharedClient<T: Transport = HttpTransport> {
    inner: Arc<Mutex<ClickatellClient<T>>>,
}

impl<T: Transport> SharedClient<T> {
    pub fn new(client: ClickatellClient<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(client)),
        }
    }

    /// Wait for exclusive access to the client
    pub async fn lock(&self) -> MutexGuard<'_, ClickatellClient<T>> {
        self.inner.lock().await
    }
}

impl<T: Transport> Clone for SharedClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
