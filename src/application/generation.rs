//! OutcomeGenerator - turns an action into a rank of positioned outcome nodes.
//!
//! Every call captures a generation epoch. Only the newest epoch is current:
//! superseding a call, cancelling everything, or loading a tree advances the
//! epoch, and a result whose epoch is no longer current is reported as
//! cancelled and never applied.
//!
//! # Modes
//!
//! - `Exclusive` - rejected with `Generation::Busy` while another call is in
//!   flight. Used for action submission.
//! - `Supersede` - cancels the outstanding call and takes over. Used for the
//!   initial generation from the intake answers.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::domain::foundation::NodeId;
use crate::domain::layout::LayoutSpacing;
use crate::domain::tree::{OutcomeFields, Position, TreeNode};
use crate::ports::{InferenceError, OutcomeQuery, OutcomeRecord, OutcomeService};

/// Monotonic marker identifying one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationEpoch(u64);

impl fmt::Display for GenerationEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a call treats one that is already in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Exclusive,
    Supersede,
}

/// What to generate and where to put it.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub query: OutcomeQuery,
    /// Position of the node the outcomes hang from.
    pub anchor: Position,
    /// True when the outcomes are the first rank below the root.
    pub first_rank: bool,
}

impl GenerationRequest {
    /// Outcomes for a submitted action at `anchor`.
    pub fn action(text: &str, anchor: Position, first_rank: bool) -> Self {
        Self {
            query: OutcomeQuery::action(text),
            anchor,
            first_rank,
        }
    }

    /// Outcomes for the intake answers, hung from a root at `anchor`.
    pub fn initial(situation: &str, action: &str, anchor: Position) -> Self {
        Self {
            query: OutcomeQuery::initial(situation, action),
            anchor,
            first_rank: true,
        }
    }
}

/// Result of one generation call.
#[derive(Debug, Clone, PartialEq)]
pub enum Generation {
    /// The call finished while still current.
    Completed {
        epoch: GenerationEpoch,
        outcomes: Vec<TreeNode>,
    },
    /// The service failed.
    Failed {
        epoch: GenerationEpoch,
        error: InferenceError,
    },
    /// The call was cancelled or superseded before its result could apply.
    Cancelled { epoch: GenerationEpoch },
    /// An exclusive call was rejected because another one is in flight.
    Busy,
    /// The action text was blank; no request was made.
    EmptyAction,
}

impl Generation {
    /// The generated outcomes, if the call completed.
    pub fn outcomes(&self) -> Option<&[TreeNode]> {
        match self {
            Generation::Completed { outcomes, .. } => Some(outcomes),
            _ => None,
        }
    }

    /// Degrades every non-success to an empty rank.
    pub fn into_outcomes(self) -> Vec<TreeNode> {
        match self {
            Generation::Completed { outcomes, .. } => outcomes,
            _ => Vec::new(),
        }
    }

    pub fn epoch(&self) -> Option<GenerationEpoch> {
        match self {
            Generation::Completed { epoch, .. }
            | Generation::Failed { epoch, .. }
            | Generation::Cancelled { epoch } => Some(*epoch),
            Generation::Busy | Generation::EmptyAction => None,
        }
    }
}

#[derive(Debug)]
struct InFlight {
    epoch: u64,
    token: CancellationToken,
}

#[derive(Debug, Default)]
struct GeneratorState {
    epoch: u64,
    in_flight: Option<InFlight>,
}

/// Issues at most one current outcome request at a time.
pub struct OutcomeGenerator {
    service: Arc<dyn OutcomeService>,
    spacing: LayoutSpacing,
    timeout: Duration,
    state: Mutex<GeneratorState>,
}

impl OutcomeGenerator {
    pub fn new(service: Arc<dyn OutcomeService>, spacing: LayoutSpacing, timeout: Duration) -> Self {
        Self {
            service,
            spacing,
            timeout,
            state: Mutex::new(GeneratorState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GeneratorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn spacing(&self) -> &LayoutSpacing {
        &self.spacing
    }

    /// True while a call is awaiting the service.
    pub fn is_generating(&self) -> bool {
        self.lock().in_flight.is_some()
    }

    /// True if no newer call, cancellation or load happened since `epoch`.
    pub fn is_current(&self, epoch: GenerationEpoch) -> bool {
        self.lock().epoch == epoch.0
    }

    /// Cancels the outstanding call, if any, and invalidates its epoch.
    pub fn cancel_all(&self) {
        let mut state = self.lock();
        if let Some(in_flight) = state.in_flight.take() {
            tracing::debug!(epoch = in_flight.epoch, "Cancelling outcome generation");
            in_flight.token.cancel();
        }
        state.epoch += 1;
    }

    /// Requests outcomes and maps them to positioned outcome nodes.
    pub async fn generate(&self, request: GenerationRequest, mode: GenerationMode) -> Generation {
        if request.query.is_blank() {
            tracing::debug!("Skipping generation for blank action");
            return Generation::EmptyAction;
        }

        let (epoch, token) = {
            let mut state = self.lock();
            if let Some(in_flight) = state.in_flight.take() {
                match mode {
                    GenerationMode::Exclusive => {
                        tracing::debug!(busy_epoch = in_flight.epoch, "Generation already in flight, rejecting");
                        state.in_flight = Some(in_flight);
                        return Generation::Busy;
                    }
                    GenerationMode::Supersede => {
                        tracing::debug!(superseded_epoch = in_flight.epoch, "Superseding outcome generation");
                        in_flight.token.cancel();
                    }
                }
            }
            state.epoch += 1;
            let token = CancellationToken::new();
            state.in_flight = Some(InFlight {
                epoch: state.epoch,
                token: token.clone(),
            });
            (GenerationEpoch(state.epoch), token)
        };

        tracing::info!(%epoch, first_rank = request.first_rank, "Generating outcomes");

        let response = tokio::select! {
            _ = token.cancelled() => None,
            result = tokio::time::timeout(self.timeout, self.service.fetch_outcomes(&request.query)) => {
                Some(result.unwrap_or(Err(InferenceError::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                })))
            }
        };

        let mut state = self.lock();
        if state.in_flight.as_ref().map(|f| f.epoch) == Some(epoch.0) {
            state.in_flight = None;
        }

        let Some(response) = response else {
            tracing::debug!(%epoch, "Outcome generation cancelled");
            return Generation::Cancelled { epoch };
        };

        if state.epoch != epoch.0 {
            tracing::debug!(%epoch, current = state.epoch, "Discarding stale outcome response");
            return Generation::Cancelled { epoch };
        }

        match response {
            Ok(records) => {
                let outcomes = self.place(&request, records);
                tracing::info!(%epoch, count = outcomes.len(), "Outcome generation completed");
                Generation::Completed { epoch, outcomes }
            }
            Err(error) => {
                tracing::warn!(%epoch, error = %error, "Outcome generation failed");
                Generation::Failed { epoch, error }
            }
        }
    }

    fn place(&self, request: &GenerationRequest, records: Vec<OutcomeRecord>) -> Vec<TreeNode> {
        let positions = self
            .spacing
            .rank(request.anchor, records.len(), request.first_rank);

        records
            .into_iter()
            .zip(positions)
            .enumerate()
            .map(|(index, (record, position))| {
                TreeNode::outcome(
                    NodeId::mint("outcome"),
                    OutcomeFields {
                        title: record.title,
                        description: record.description,
                        probability: record.probability,
                        option_number: index as u32 + 1,
                    },
                    position,
                )
            })
            .collect()
    }
}
