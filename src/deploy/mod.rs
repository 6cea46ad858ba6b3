// ABOUTME: The action-lifecycle engine: per-foundation Actions and the coordinator.
// ABOUTME: Push, start, and stop flavors plus their creators.

mod action;
mod bluegreen;
mod creator;
mod error;
mod info;
mod push;
mod start;
mod stop;

pub use action::{Action, ActionState};
pub use bluegreen::BlueGreen;
pub use creator::{ActionCreator, PushCreator, StartCreator, StopCreator};
pub use error::{DeployError, OrchestrationError, Phase, PhaseError};
pub use info::{DeploymentInfo, TEMPORARY_NAME_SUFFIX};
pub use push::{PushFinishedEvent, Pusher};
pub use start::Starter;
pub use stop::Stopper;
