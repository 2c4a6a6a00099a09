//! Vitrina Upload Orchestrator
//!
//! Client-resident orchestration of concurrent asset uploads: validation,
//! slot accounting, per-asset session state machines over the two-phase
//! credential-then-transport protocol, and partial-failure handling. The
//! host form owns the committed list; the orchestrator only ever hands back
//! freshly built replacement sequences through the [`UploadEvents`] sink.

pub mod events;
pub mod orchestrator;
pub mod preview;
pub mod slots;

mod session;

pub use events::{NoOpUploadEvents, RejectReason, UploadEvents};
pub use orchestrator::Orchestrator;
pub use preview::{PreviewHandle, PreviewRegistry};
pub use slots::SlotAllocator;

// The broker/transport seams come from vitrina-client; re-exported so hosts
// wiring mocks or custom backends need only this crate.
pub use vitrina_client::{Auth, CredentialBroker, Transport};
