pub mod error;
pub mod model;
pub mod normalizer;
pub mod poller;
pub mod service;

pub use error::GenerationError;
pub use model::{
    GenerationRequest, GenerationResult, GenerationStatus, GenerationTask, ResultDetails,
    Submission, Vendor,
};
pub use normalizer::{PayloadProfile, ResultNormalizer};
pub use poller::{poll_until_terminal, PollError, PollObservation, PollPolicy, Polled};
pub use service::{GenerationService, GenerationServiceApi, SubmitOutcome};

use async_trait::async_trait;
use serde_json::Value;

/// One vendor's start and status calls.
///
/// `fetch_status` distinguishes three outcomes: a parsed payload
/// (`Observed`), a transient miss worth retrying (`Miss`), and a persistent
/// failure (`Err`) that should stop polling.
#[async_trait]
pub trait GenerationRepository: Send + Sync {
    fn vendor(&self) -> Vendor;

    fn profile(&self) -> &PayloadProfile;

    async fn submit(&self, request: &GenerationRequest) -> Result<Submission, GenerationError>;

    async fn fetch_status(&self, task_id: &str) -> Result<PollObservation<Value>, GenerationError>;
}
