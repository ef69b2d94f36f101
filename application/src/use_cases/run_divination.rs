//! Run Divination use case.
//!
//! The single entry point the presentation layer uses: validate the
//! submission, build the prompt, open the transport and hand back a lazy
//! stream of [`StreamEvent`]s.
//!
//! Only one session may be active per use case instance. The gate is held by
//! the returned [`DivinationStream`] and released when the stream is
//! exhausted or dropped, whichever comes first.

use crate::ingest::{EventStream, IngestOptions, StreamIngestor};
use crate::ports::progress::{NoProgress, ReadingProgress};
use crate::ports::transport::OracleTransport;
use arcana_domain::util::preview;
use arcana_domain::{
    DivinationKind, DivinationRequest, DomainError, InstructionTable, PromptBuilder, ResultText,
    StreamEvent,
};
use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};
use thiserror::Error;
use tracing::{error, info};

/// Errors that prevent a session from starting.
///
/// Transport failures surface as the sentinel inside the returned stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunDivinationError {
    #[error("Invalid request: {0}")]
    Invalid(#[from] DomainError),

    #[error("A reading is already in progress")]
    SessionActive,
}

/// Holds the single-session gate closed while alive.
#[derive(Debug)]
struct SessionGuard {
    gate: Arc<AtomicBool>,
}

impl SessionGuard {
    fn acquire(gate: &Arc<AtomicBool>) -> Option<Self> {
        gate.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { gate: gate.clone() })
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.gate.store(false, Ordering::Release);
    }
}

/// The lazy event stream of one reading.
pub struct DivinationStream {
    kind: DivinationKind,
    events: EventStream,
    guard: Option<SessionGuard>,
}

impl DivinationStream {
    pub fn kind(&self) -> DivinationKind {
        self.kind
    }

    /// Drain the stream into `result`, which is reset first.
    pub async fn collect_into(mut self, result: &mut ResultText) {
        result.reset();
        while let Some(event) = self.next().await {
            result.apply(&event);
        }
    }

    /// Drain the stream, reporting every event to `progress`.
    ///
    /// `on_reading_start` is not repeated here; it fires from
    /// [`RunDivinationUseCase::execute_with_progress`] before the connection
    /// is opened.
    pub async fn drive(mut self, progress: &dyn ReadingProgress) -> ResultText {
        let mut result = ResultText::new();
        while let Some(event) = self.next().await {
            match &event {
                StreamEvent::Delta(chunk) => progress.on_chunk(chunk),
                StreamEvent::Interrupted(sentinel) => progress.on_interrupted(sentinel),
            }
            result.apply(&event);
        }
        progress.on_reading_end();
        result
    }
}

impl Stream for DivinationStream {
    type Item = StreamEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let polled = self.events.as_mut().poll_next(cx);
        if let Poll::Ready(None) = polled {
            if self.guard.take().is_some() {
                info!(kind = %self.kind, "Divination session ended");
            }
        }
        polled
    }
}

/// Use case for streaming a reading.
pub struct RunDivinationUseCase {
    transport: Arc<dyn OracleTransport>,
    instructions: Arc<InstructionTable>,
    options: IngestOptions,
    gate: Arc<AtomicBool>,
}

impl RunDivinationUseCase {
    pub fn new(transport: Arc<dyn OracleTransport>, instructions: Arc<InstructionTable>) -> Self {
        Self {
            transport,
            instructions,
            options: IngestOptions::default(),
            gate: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set how sessions decode their body.
    pub fn with_ingest_options(mut self, options: IngestOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether a session is currently active.
    pub fn is_busy(&self) -> bool {
        self.gate.load(Ordering::Acquire)
    }

    /// Validate and start a reading.
    ///
    /// Fails without touching the transport if the submission is invalid or
    /// a session is already active.
    pub async fn submit(
        &self,
        kind: DivinationKind,
        user_text: &str,
        context: Option<String>,
    ) -> Result<DivinationStream, RunDivinationError> {
        let request = DivinationRequest::try_new(kind, user_text, context)?;
        self.execute(request).await
    }

    /// Start a reading for an already validated request.
    pub async fn execute(
        &self,
        request: DivinationRequest,
    ) -> Result<DivinationStream, RunDivinationError> {
        self.execute_with_progress(request, &NoProgress).await
    }

    /// Start a reading, notifying `progress` before the transport is opened.
    pub async fn execute_with_progress(
        &self,
        request: DivinationRequest,
        progress: &dyn ReadingProgress,
    ) -> Result<DivinationStream, RunDivinationError> {
        let guard = SessionGuard::acquire(&self.gate).ok_or(RunDivinationError::SessionActive)?;

        info!(
            kind = %request.kind(),
            question = %preview(request.user_text(), 60),
            has_context = request.context().is_some(),
            "Starting divination session"
        );

        progress.on_reading_start(request.kind());

        let prompt = PromptBuilder::new(&self.instructions).prompt_for(&request);
        let ingestor = StreamIngestor::new(self.options.clone());

        let events: EventStream = match self.transport.open(&prompt).await {
            Ok(body) => Box::pin(ingestor.ingest(body)),
            Err(e) => {
                error!(error = %e, "Failed to open divination stream");
                Box::pin(ingestor.failed())
            }
        };

        Ok(DivinationStream {
            kind: request.kind(),
            events,
            guard: Some(guard),
        })
    }
}
