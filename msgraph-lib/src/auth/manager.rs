//! Managed token with background refresh.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use log::error;
use log::info;
use tokio::sync::Mutex;
use tokio::time;
use tokio::time::Instant;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::error::AuthError;
use crate::error::ConfigError;
use crate::error::Error;

/// Default token refresh interval in seconds.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 3300;

/// Shortest allowed token refresh interval in seconds.
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 60;

/// Longest allowed token refresh interval in seconds.
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 3600;

/// Source of fresh access tokens for a managed client.
///
/// Called once when management starts and then on every refresh tick.
#[async_trait]
pub trait TokenSource: Send + Sync + 'static {
    /// Acquires a new access token.
    async fn fetch_token(&self) -> Result<String, Error>;
}

/// Validates a refresh interval in seconds.
pub(crate) fn validate_refresh_interval(secs: u64) -> Result<(), ConfigError> {
    if (MIN_REFRESH_INTERVAL_SECS..=MAX_REFRESH_INTERVAL_SECS).contains(&secs) {
        Ok(())
    } else {
        Err(ConfigError::RefreshInterval {
            value: secs,
            min: MIN_REFRESH_INTERVAL_SECS,
            max: MAX_REFRESH_INTERVAL_SECS,
        })
    }
}

/// Owns the shared token slot and the refresh task writing to it.
///
/// Readers load the slot without blocking; the refresh task replaces the whole
/// token at once. Dropping the manager cancels the task.
pub(crate) struct TokenManager {
    slot: Arc<ArcSwapOption<String>>,
    managed: AtomicBool,
    refresh_interval: AtomicU64,
    /// Cancels the running refresh task. Also serializes manage/stop.
    task: Mutex<Option<CancellationToken>>,
    logging: bool,
}

impl TokenManager {
    pub(crate) fn new(refresh_interval: u64, logging: bool) -> Result<Self, ConfigError> {
        validate_refresh_interval(refresh_interval)?;

        Ok(Self {
            slot: Arc::new(ArcSwapOption::empty()),
            managed: AtomicBool::new(false),
            refresh_interval: AtomicU64::new(refresh_interval),
            task: Mutex::new(None),
            logging,
        })
    }

    pub(crate) fn refresh_interval(&self) -> u64 {
        self.refresh_interval.load(Ordering::Relaxed)
    }

    /// Takes effect on the next [`TokenManager::manage`].
    pub(crate) fn set_refresh_interval(&self, secs: u64) -> Result<(), ConfigError> {
        validate_refresh_interval(secs)?;
        self.refresh_interval.store(secs, Ordering::Relaxed);
        Ok(())
    }

    pub(crate) fn is_managed(&self) -> bool {
        self.managed.load(Ordering::Acquire)
    }

    pub(crate) fn token(&self) -> Option<String> {
        self.slot.load_full().map(|token| token.as_str().to_owned())
    }

    /// Acquires a token now and keeps refreshing it in the background.
    pub(crate) async fn manage<S: TokenSource>(&self, source: S) -> Result<(), Error> {
        let mut task = self.task.lock().await;

        if task.is_some() {
            return Err(AuthError::AlreadyManaged.into());
        }

        let token = match source.fetch_token().await {
            Ok(token) => token,
            Err(e) => {
                if self.logging {
                    error!("exception while trying to set manage token: {}", e);
                }
                return Err(AuthError::TokenManagement(Box::new(e)).into());
            }
        };

        self.slot.store(Some(Arc::new(token)));

        let cancel = CancellationToken::new();
        let period = Duration::from_secs(self.refresh_interval());
        tokio::spawn(refresh_loop(
            source,
            Arc::clone(&self.slot),
            period,
            cancel.clone(),
            self.logging,
        ));

        *task = Some(cancel);
        self.managed.store(true, Ordering::Release);

        if self.logging {
            info!("token acquired, refreshing every {}s", period.as_secs());
        }

        Ok(())
    }

    /// Stops the refresh task and forgets the token.
    pub(crate) async fn stop(&self) {
        let mut task = self.task.lock().await;

        if let Some(cancel) = task.take() {
            cancel.cancel();
        }

        self.managed.store(false, Ordering::Release);
        self.slot.store(None);
    }
}

impl Drop for TokenManager {
    fn drop(&mut self) {
        if let Some(cancel) = self.task.get_mut().take() {
            cancel.cancel();
        }
    }
}

async fn refresh_loop<S: TokenSource>(
    source: S,
    slot: Arc<ArcSwapOption<String>>,
    period: Duration,
    cancel: CancellationToken,
    logging: bool,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            result = source.fetch_token() => match result {
                Ok(token) => {
                    slot.store(Some(Arc::new(token)));
                    if logging {
                        info!("token has been refreshed");
                    }
                }
                Err(e) => {
                    if logging {
                        error!("failed to refresh token: {}", e);
                    }
                }
            },
        }
    }
}
