//! Event-driven controller for a conversion session.
//!
//! All work runs on one logical task: the controller loop multiplexes
//! UI events and debounce expirations, so the rate cache and the
//! loading flag have a single writer and need no locking.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::RateCache;
use crate::convert::{self, ConversionRequest, ConversionResult};
use crate::error::ConvertError;
use crate::rates::RateProvider;

/// User-driven events the controller reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Manual convert trigger.
    Submit,
    /// Exchange source and target currencies.
    Swap,
    SourceChanged(String),
    TargetChanged(String),
    /// Raw amount text as typed; conversion is debounced.
    AmountEdited(String),
}

/// Phase of the conversion session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Loading,
    Ready(ConversionResult),
    Error(String),
}

/// Display operations the controller drives. The terminal front end
/// and the tests both implement this.
pub trait RenderSink: Send {
    /// Empty text clears the display.
    fn set_converted_amount(&mut self, text: &str);
    fn set_rate_text(&mut self, text: &str);
    /// `None` hides the error banner.
    fn set_error(&mut self, message: Option<&str>);
    fn set_loading(&mut self, loading: bool);
    fn set_convert_enabled(&mut self, enabled: bool);
}

/// Cancellable one-shot timer coalescing bursts of amount edits.
///
/// Each `schedule` aborts the previous pending timer and bumps the
/// generation; an expiration carrying a stale generation is ignored,
/// so only the most recent schedule within a burst ever fires.
struct Debouncer {
    delay: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::Sender<u64>,
}

impl Debouncer {
    fn new(delay: Duration) -> (Self, mpsc::Receiver<u64>) {
        let (tx, rx) = mpsc::channel(8);
        (
            Self {
                delay,
                generation: 0,
                pending: None,
                tx,
            },
            rx,
        )
    }

    fn schedule(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.generation += 1;
        let generation = self.generation;
        let delay = self.delay;
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(generation).await;
        }));
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }
}

/// Orchestrates the fetch/cache/convert cycle in response to UI events.
pub struct Controller<P, S> {
    provider: P,
    sink: S,
    cache: RateCache,
    debouncer: Debouncer,
    timer_rx: mpsc::Receiver<u64>,
    from: String,
    to: String,
    amount: String,
    state: SessionState,
}

impl<P: RateProvider, S: RenderSink> Controller<P, S> {
    pub fn new(
        provider: P,
        sink: S,
        from: &str,
        to: &str,
        amount: &str,
        debounce: Duration,
    ) -> Self {
        let (debouncer, timer_rx) = Debouncer::new(debounce);
        Self {
            provider,
            sink,
            cache: RateCache::new(),
            debouncer,
            timer_rx,
            from: from.to_string(),
            to: to.to_string(),
            amount: amount.to_string(),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn source(&self) -> &str {
        &self.from
    }

    pub fn target(&self) -> &str {
        &self.to
    }

    pub fn amount_text(&self) -> &str {
        &self.amount
    }

    /// Runs the startup conversion cycle with the preset selection,
    /// then serves events until the channel closes.
    pub async fn run(mut self, mut events: mpsc::Receiver<UiEvent>) -> Self {
        self.convert_now().await;

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => break,
                },
                Some(generation) = self.timer_rx.recv() => {
                    if self.debouncer.is_current(generation) {
                        self.convert_now().await;
                    } else {
                        debug!(generation, "Ignoring superseded debounce timer");
                    }
                }
            }
        }
        self
    }

    pub async fn handle_event(&mut self, event: UiEvent) {
        debug!(?event, "Handling UI event");
        match event {
            UiEvent::Submit => self.convert_now().await,
            UiEvent::Swap => self.swap().await,
            UiEvent::SourceChanged(code) => {
                self.from = code;
                self.convert_now().await;
            }
            UiEvent::TargetChanged(code) => {
                self.to = code;
                self.convert_now().await;
            }
            UiEvent::AmountEdited(text) => {
                self.amount = text;
                self.debouncer.schedule();
            }
        }
    }

    /// Exchanges source and target. A displayed result becomes the new
    /// input amount, so the next run approximates the inverse
    /// conversion. Always triggers a full conversion cycle.
    async fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
        if let SessionState::Ready(result) = &self.state {
            self.amount = result.amount_text();
        }
        self.convert_now().await;
    }

    async fn convert_now(&mut self) {
        let Some(amount) = parse_amount(&self.amount) else {
            // Not an error: silently reset the display.
            self.state = SessionState::Idle;
            self.sink.set_converted_amount("");
            self.sink.set_rate_text("");
            return;
        };

        self.state = SessionState::Loading;
        self.sink.set_error(None);
        self.sink.set_loading(true);
        self.sink.set_convert_enabled(false);

        let outcome = self.run_conversion(amount).await;

        // Leaving Loading restores the interactive controls no matter
        // which exit was taken.
        self.sink.set_loading(false);
        self.sink.set_convert_enabled(true);

        match outcome {
            Ok(Some(result)) => {
                self.sink.set_converted_amount(&result.amount_text());
                self.sink
                    .set_rate_text(&result.rate_text(&self.from, &self.to));
                self.state = SessionState::Ready(result);
            }
            Ok(None) => {
                debug!("Discarding conversion for a superseded selection");
                self.state = SessionState::Idle;
            }
            Err(err) => {
                let message = format!("Failed to convert currency: {err}");
                warn!(error = %err, "Conversion failed");
                self.sink.set_converted_amount("");
                self.sink.set_rate_text("");
                self.sink.set_error(Some(&message));
                self.state = SessionState::Error(message);
            }
        }
    }

    /// Fetches rates if the cached base differs, then converts.
    ///
    /// Returns `Ok(None)` when the selection changed underneath an
    /// in-flight fetch; the newer cycle owns the display then.
    async fn run_conversion(
        &mut self,
        amount: f64,
    ) -> Result<Option<ConversionResult>, ConvertError> {
        let request = ConversionRequest {
            amount,
            from: self.from.clone(),
            to: self.to.clone(),
        };

        if self.cache.should_refetch(&request.from) {
            let table = self.provider.fetch_rates(&request.from).await?;
            if request.from != self.from || request.to != self.to {
                return Ok(None);
            }
            self.cache.store(request.from.clone(), table);
        } else {
            debug!(base = ?self.cache.base(), "Using cached rate table");
        }

        let table = self.cache.table().ok_or(ConvertError::RateUnavailable)?;
        convert::convert(&request, table).map(Some)
    }
}

/// Amounts must be present, finite, and strictly positive to trigger a
/// conversion.
fn parse_amount(text: &str) -> Option<f64> {
    let amount: f64 = text.trim().parse().ok()?;
    (amount.is_finite() && amount > 0.0).then_some(amount)
}
