//! Application layer - interaction state and generation orchestration.
//!
//! This layer drives domain edits from user input and coordinates the
//! outcome service and the flowchart repository through their ports.

mod click;
mod controller;
mod debounce;
mod generation;
mod intake;

pub use click::{ClickKind, ClickTracker, ClickTracking, DEFAULT_DOUBLE_CLICK_THRESHOLD};
pub use controller::{
    ChartPhase, ClickOutcome, ControllerError, ControllerSettings, IntakeOutcome,
    InteractionController, SubmitOutcome,
};
pub use debounce::Debouncer;
pub use generation::{
    Generation, GenerationEpoch, GenerationMode, GenerationRequest, OutcomeGenerator,
};
pub use intake::{Intake, IntakeProgress, IntakeQuestion, DEFAULT_ACTION, DEFAULT_SITUATION};
