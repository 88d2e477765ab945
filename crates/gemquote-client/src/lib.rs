//! Client side of the gemquote intake.
//!
//! [`ApiClient`] talks to the intake API. [`IntakeOrchestrator`] drives one
//! submission through upload then record, with the queue position and ETA
//! figures supplied by the estimators in [`estimator`]. Anything that wants to
//! open the intake goes through an [`IntakeController`].

pub mod config;
pub mod controller;
pub mod error;
pub mod estimator;
pub mod form;
pub mod orchestrator;
pub mod session;
pub mod transport;

pub use config::ClientConfig;
pub use controller::{IntakeController, IntakeTrigger, SharedIntakeController, Subscription};
pub use error::{OrchestratorError, SessionError, TransportError};
pub use estimator::{EtaEstimator, QueueEstimator, RandomEtaEstimator, SimulatedQueueEstimator};
pub use form::{IntakeForm, PhotoFile, SubmitBlocker};
pub use orchestrator::{IntakeOrchestrator, IntakeState, FAILURE_NOTICE};
pub use session::{JsonFileSessionStore, MemorySessionStore, SessionStore};
pub use transport::{ApiClient, IntakeTransport};
