//! InteractionController - owns the current tree and turns user input into
//! tree edits and generation calls.
//!
//! The controller is a cheap, cloneable handle. All state sits behind one
//! mutex that is never held across an `.await`: async operations read what
//! they need, release the lock, await the service, then re-acquire the lock
//! and re-resolve node ids before applying anything.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::click::{ClickKind, ClickTracker, ClickTracking, DEFAULT_DOUBLE_CLICK_THRESHOLD};
use super::debounce::Debouncer;
use super::generation::{Generation, GenerationMode, GenerationRequest, OutcomeGenerator};
use super::intake::{Intake, IntakeProgress, IntakeQuestion};
use crate::config::AppConfig;
use crate::domain::foundation::{FlowchartId, NodeId, UserId};
use crate::domain::layout::{bounding_box, scene, LayoutSpacing, Scene, Size, ViewTransform};
use crate::domain::tree::{
    attach_action, complete_action, count_outcomes, find_by_id, path_of, replace_children,
    replace_position, validate_tree, NodeKind, NodePath, OutcomeDetail, Position, TreeError,
    TreeNode,
};
use crate::ports::{
    FlowchartRepository, FlowchartSummary, InferenceError, OutcomeService, RepositoryError,
};

/// Errors from the persistence operations of the controller.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("loaded tree is invalid: {0}")]
    InvalidTree(#[from] TreeError),

    #[error("controller has been shut down")]
    ShutDown,
}

/// Which screen the chart is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartPhase {
    /// Collecting the situation and first action.
    Intake,
    /// The tree is on screen.
    Rendered,
}

/// Result of a click.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// The node became the selection; action nodes also became the editing node.
    Selected { path: NodePath, editing: bool },
    /// A double click on an outcome opened a new empty action under it.
    ActionOpened { action: NodeId },
    /// The id no longer resolves in the current tree.
    Stale,
    /// The controller has been shut down.
    Ignored,
}

/// Result of an action submission or the initial generation.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Outcomes were attached to the action.
    Applied { outcomes: usize },
    /// The service failed; no outcomes were attached.
    Failed(InferenceError),
    /// The call was superseded, cancelled or outlived by a load.
    Cancelled,
    /// Another generation is in flight.
    Busy,
    /// The action text was blank.
    EmptyAction,
    /// The node is gone from the current tree.
    Stale,
    /// The node is not an action.
    NotAnAction,
    /// The controller has been shut down.
    Ignored,
}

/// Result of answering an intake question.
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeOutcome {
    /// Ask this question next.
    Ask(IntakeQuestion),
    /// Both answers are in and the initial generation ran.
    Started(SubmitOutcome),
    /// The intake is already over.
    Closed,
}

/// Tunables for one controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub spacing: LayoutSpacing,
    pub double_click_threshold: Duration,
    pub click_tracking: ClickTracking,
    pub submit_debounce: Duration,
    pub zoom_step: f64,
    pub generation_timeout: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            spacing: LayoutSpacing::default(),
            double_click_threshold: DEFAULT_DOUBLE_CLICK_THRESHOLD,
            click_tracking: ClickTracking::default(),
            submit_debounce: Duration::from_millis(500),
            zoom_step: 1.2,
            generation_timeout: Duration::from_secs(60),
        }
    }
}

impl ControllerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            spacing: config.layout.spacing,
            double_click_threshold: config.interaction.double_click_threshold(),
            click_tracking: config.interaction.click_tracking,
            submit_debounce: config.interaction.submit_debounce(),
            zoom_step: config.layout.zoom_step,
            generation_timeout: config.inference.generation_timeout(),
        }
    }
}

#[derive(Debug, Clone)]
struct PendingSubmission {
    node: NodeId,
    text: String,
}

struct ControllerState {
    tree: Arc<TreeNode>,
    phase: ChartPhase,
    intake: Intake,
    selection: NodePath,
    editing: Option<NodeId>,
    view: ViewTransform,
    clicks: ClickTracker,
    submissions: Debouncer<PendingSubmission>,
    outcome_count: usize,
    shut_down: bool,
}

struct Inner {
    generator: OutcomeGenerator,
    repository: Arc<dyn FlowchartRepository>,
    user: UserId,
    settings: ControllerSettings,
    shutdown: CancellationToken,
    state: Mutex<ControllerState>,
}

/// Handle to one decision tree and its interaction state.
#[derive(Clone)]
pub struct InteractionController {
    inner: Arc<Inner>,
}

fn placeholder_root() -> TreeNode {
    TreeNode::action(NodeId::mint("start"), "", Position::ORIGIN)
}

impl InteractionController {
    pub fn new(
        service: Arc<dyn OutcomeService>,
        repository: Arc<dyn FlowchartRepository>,
        user: UserId,
        settings: ControllerSettings,
    ) -> Self {
        let generator = OutcomeGenerator::new(service, settings.spacing, settings.generation_timeout);
        let state = ControllerState {
            tree: Arc::new(placeholder_root()),
            phase: ChartPhase::Intake,
            intake: Intake::new(),
            selection: NodePath::root(),
            editing: None,
            view: ViewTransform::default(),
            clicks: ClickTracker::new(settings.double_click_threshold, settings.click_tracking),
            submissions: Debouncer::new(settings.submit_debounce),
            outcome_count: 0,
            shut_down: false,
        };

        Self {
            inner: Arc::new(Inner {
                generator,
                repository,
                user,
                settings,
                shutdown: CancellationToken::new(),
                state: Mutex::new(state),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spacing(&self) -> &LayoutSpacing {
        &self.inner.settings.spacing
    }

    // ════════════════════════════════════════════════════════════════════
    // Queries
    // ════════════════════════════════════════════════════════════════════

    /// The current tree. Later edits never change a returned snapshot.
    pub fn snapshot(&self) -> Arc<TreeNode> {
        self.lock().tree.clone()
    }

    pub fn phase(&self) -> ChartPhase {
        self.lock().phase
    }

    pub fn selection(&self) -> NodePath {
        self.lock().selection.clone()
    }

    pub fn editing(&self) -> Option<NodeId> {
        self.lock().editing.clone()
    }

    pub fn is_generating(&self) -> bool {
        self.inner.generator.is_generating()
    }

    /// Size of the last rank attached to the tree, zero after a failed
    /// generation, or the outcome total of a loaded tree.
    pub fn outcome_count(&self) -> usize {
        self.lock().outcome_count
    }

    pub fn intake_question(&self) -> Option<IntakeQuestion> {
        let state = self.lock();
        match state.phase {
            ChartPhase::Intake => state.intake.current(),
            ChartPhase::Rendered => None,
        }
    }

    pub fn situation(&self) -> Option<String> {
        self.lock().intake.situation().map(str::to_string)
    }

    pub fn zoom(&self) -> f64 {
        self.lock().view.zoom()
    }

    /// Read-only detail of an outcome, for the `+` affordance.
    pub fn expand(&self, id: &NodeId) -> Option<OutcomeDetail> {
        let state = self.lock();
        find_by_id(&state.tree, id).and_then(TreeNode::outcome_detail)
    }

    /// Render-ready projection of the current tree and selection.
    pub fn scene(&self) -> Scene {
        let state = self.lock();
        scene(&state.tree, &state.selection, self.spacing())
    }

    // ════════════════════════════════════════════════════════════════════
    // Pointer input
    // ════════════════════════════════════════════════════════════════════

    /// Handles a click on `id` at `now`, telling single from double clicks.
    pub fn click(&self, id: &NodeId, now: Instant) -> ClickOutcome {
        let mut state = self.lock();
        if state.shut_down {
            return ClickOutcome::Ignored;
        }

        let Some(path) = path_of(&state.tree, id) else {
            tracing::debug!(node_id = %id, "Click on stale node ignored");
            state.clicks.reset();
            return ClickOutcome::Stale;
        };

        let kind = state.clicks.register(id, now);
        match kind {
            ClickKind::Double => match self.open_action_locked(&mut state, id) {
                Some(action) => ClickOutcome::ActionOpened { action },
                None => select_locked(&mut state, id, path),
            },
            ClickKind::Single => select_locked(&mut state, id, path),
        }
    }

    /// Opens a new empty action under the outcome `id`.
    ///
    /// Returns the new action's id, or `None` if `id` is stale or not an
    /// outcome.
    pub fn open_action(&self, id: &NodeId) -> Option<NodeId> {
        let mut state = self.lock();
        if state.shut_down {
            return None;
        }
        self.open_action_locked(&mut state, id)
    }

    fn open_action_locked(&self, state: &mut ControllerState, id: &NodeId) -> Option<NodeId> {
        let path = path_of(&state.tree, id)?;
        let outcome = find_by_id(&state.tree, id)?;
        if !outcome.is(NodeKind::Outcome) {
            return None;
        }

        let action_id = NodeId::mint("action");
        let action = TreeNode::action(
            action_id.clone(),
            "",
            self.spacing().action_slot(outcome.position()),
        );
        let tree = attach_action(&state.tree, &path, action)?;

        tracing::debug!(outcome_id = %id, action_id = %action_id, "Opened action under outcome");
        state.tree = tree;
        state.selection = path;
        state.editing = Some(action_id.clone());
        Some(action_id)
    }

    /// Moves one node. Descendants keep their coordinates.
    pub fn drag(&self, id: &NodeId, position: Position) -> bool {
        let mut state = self.lock();
        if state.shut_down {
            return false;
        }
        let Some(path) = path_of(&state.tree, id) else {
            return false;
        };
        match replace_position(&state.tree, &path, position) {
            Some(tree) => {
                state.tree = tree;
                true
            }
            None => false,
        }
    }

    // ════════════════════════════════════════════════════════════════════
    // Action submission
    // ════════════════════════════════════════════════════════════════════

    /// Queues a submission. Submissions arriving within the debounce window
    /// replace each other; only the last one runs.
    ///
    /// Drive it with [`run_pending_submission`](Self::run_pending_submission).
    pub fn submit_action(&self, id: NodeId, text: impl Into<String>, now: Instant) -> Option<Instant> {
        let mut state = self.lock();
        if state.shut_down {
            return None;
        }
        let deadline = state.submissions.push(
            PendingSubmission {
                node: id,
                text: text.into(),
            },
            now,
        );
        Some(deadline)
    }

    /// Waits for the debounce deadline and runs the pending submission.
    ///
    /// Returns `None` if another driver took the submission, nothing was
    /// pending, or the controller shut down while waiting.
    pub async fn run_pending_submission(&self) -> Option<SubmitOutcome> {
        loop {
            let deadline = {
                let state = self.lock();
                if state.shut_down {
                    return None;
                }
                state.submissions.deadline()?
            };

            tokio::select! {
                _ = self.inner.shutdown.cancelled() => return None,
                _ = tokio::time::sleep_until(deadline) => {}
            }

            let due = self.lock().submissions.take_due(Instant::now());
            if let Some(pending) = due {
                return Some(self.submit_action_now(&pending.node, &pending.text).await);
            }
        }
    }

    /// Generates outcomes for the action `id` and attaches them.
    pub async fn submit_action_now(&self, id: &NodeId, text: &str) -> SubmitOutcome {
        let request = {
            let state = self.lock();
            if state.shut_down {
                return SubmitOutcome::Ignored;
            }
            let Some(path) = path_of(&state.tree, id) else {
                return SubmitOutcome::Stale;
            };
            let Some(node) = find_by_id(&state.tree, id) else {
                return SubmitOutcome::Stale;
            };
            if !node.is(NodeKind::Action) {
                return SubmitOutcome::NotAnAction;
            }
            GenerationRequest::action(text, node.position(), path.is_root())
        };

        let generation = self
            .inner
            .generator
            .generate(request, GenerationMode::Exclusive)
            .await;

        let mut state = self.lock();
        let (epoch, outcomes) = match generation {
            Generation::Completed { epoch, outcomes } => (epoch, outcomes),
            Generation::Failed { epoch, error } => {
                if self.inner.generator.is_current(epoch) {
                    state.outcome_count = 0;
                }
                return SubmitOutcome::Failed(error);
            }
            other => return settle(other),
        };
        if state.shut_down || !self.inner.generator.is_current(epoch) {
            return SubmitOutcome::Cancelled;
        }
        let Some(path) = path_of(&state.tree, id) else {
            tracing::debug!(node_id = %id, "Action removed while generating, dropping outcomes");
            return SubmitOutcome::Stale;
        };

        let count = outcomes.len();
        match complete_action(&state.tree, &path, text, outcomes) {
            Some(tree) => {
                state.tree = tree;
                state.editing = None;
                state.outcome_count = count;
                SubmitOutcome::Applied { outcomes: count }
            }
            None => SubmitOutcome::Stale,
        }
    }

    // ════════════════════════════════════════════════════════════════════
    // Intake
    // ════════════════════════════════════════════════════════════════════

    /// Answers the current intake question; the second answer starts the
    /// initial generation.
    pub async fn answer(&self, text: impl Into<String>) -> IntakeOutcome {
        let progress = {
            let mut state = self.lock();
            if state.shut_down || state.phase != ChartPhase::Intake {
                return IntakeOutcome::Closed;
            }
            state.intake.answer(text)
        };

        match progress {
            IntakeProgress::Ask(question) => IntakeOutcome::Ask(question),
            IntakeProgress::Ready { situation, action } => {
                IntakeOutcome::Started(self.start(&situation, &action).await)
            }
        }
    }

    /// Seeds the root with the action and generates the first rank.
    ///
    /// Supersedes any generation already in flight. The chart is rendered
    /// only once a non-empty rank is attached; a failed or empty generation
    /// during the intake asks for the action again.
    pub async fn start(&self, situation: &str, action: &str) -> SubmitOutcome {
        let anchor = Position::ORIGIN;
        {
            let mut state = self.lock();
            if state.shut_down {
                return SubmitOutcome::Ignored;
            }
            state.submissions.cancel();
            state.tree = Arc::new(TreeNode::action(NodeId::mint("root"), action, anchor));
            state.selection = NodePath::root();
            state.editing = None;
        }

        let generation = self
            .inner
            .generator
            .generate(GenerationRequest::initial(situation, action, anchor), GenerationMode::Supersede)
            .await;

        let mut state = self.lock();
        if state.shut_down {
            return SubmitOutcome::Ignored;
        }
        match generation {
            Generation::Completed { epoch, outcomes } => {
                if !self.inner.generator.is_current(epoch) {
                    return SubmitOutcome::Cancelled;
                }
                let count = outcomes.len();
                if count == 0 {
                    state.outcome_count = 0;
                    reopen_intake(&mut state);
                    return SubmitOutcome::Applied { outcomes: 0 };
                }
                match replace_children(&state.tree, &NodePath::root(), outcomes) {
                    Some(tree) => {
                        state.tree = tree;
                        state.phase = ChartPhase::Rendered;
                        state.outcome_count = count;
                        SubmitOutcome::Applied { outcomes: count }
                    }
                    None => SubmitOutcome::Stale,
                }
            }
            Generation::Failed { epoch, error } => {
                if self.inner.generator.is_current(epoch) {
                    state.outcome_count = 0;
                    reopen_intake(&mut state);
                }
                SubmitOutcome::Failed(error)
            }
            other => settle(other),
        }
    }

    /// Bypasses the intake with placeholder answers and no generation.
    pub fn skip(&self) -> bool {
        let mut state = self.lock();
        if state.shut_down || state.phase != ChartPhase::Intake {
            return false;
        }
        self.inner.generator.cancel_all();

        let IntakeProgress::Ready { action, .. } = state.intake.skip() else {
            return false;
        };
        let root = TreeNode::action(NodeId::mint("root"), action, Position::ORIGIN);
        state.editing = Some(root.id().clone());
        state.tree = Arc::new(root);
        state.selection = NodePath::root();
        state.outcome_count = 0;
        state.phase = ChartPhase::Rendered;
        tracing::debug!("Intake skipped");
        true
    }

    // ════════════════════════════════════════════════════════════════════
    // Persistence
    // ════════════════════════════════════════════════════════════════════

    /// Stores the current snapshot for this controller's user.
    pub async fn save(&self) -> Result<FlowchartId, ControllerError> {
        let tree = {
            let state = self.lock();
            if state.shut_down {
                return Err(ControllerError::ShutDown);
            }
            state.tree.clone()
        };
        let id = self.inner.repository.save(&self.inner.user, tree).await?;
        tracing::info!(flowchart_id = %id, "Flowchart saved");
        Ok(id)
    }

    /// Replaces the tree wholesale with a saved one.
    ///
    /// Pending submissions and in-flight generations are cancelled and both
    /// cursors are cleared. An invalid tree leaves the current one in place.
    pub async fn load(&self, id: FlowchartId) -> Result<(), ControllerError> {
        let tree = self.inner.repository.load(id).await?;
        validate_tree(&tree)?;

        let mut state = self.lock();
        if state.shut_down {
            return Err(ControllerError::ShutDown);
        }
        state.submissions.cancel();
        self.inner.generator.cancel_all();
        state.outcome_count = count_outcomes(&tree);

        state.tree = tree;
        state.selection = NodePath::root();
        state.editing = None;
        state.clicks.reset();
        state.phase = ChartPhase::Rendered;
        tracing::info!(flowchart_id = %id, "Flowchart loaded");
        Ok(())
    }

    /// This user's saved flowcharts, newest first.
    pub async fn history(&self) -> Result<Vec<FlowchartSummary>, ControllerError> {
        Ok(self.inner.repository.list(&self.inner.user).await?)
    }

    // ════════════════════════════════════════════════════════════════════
    // View
    // ════════════════════════════════════════════════════════════════════

    pub fn zoom_in(&self, viewport: Size) -> f64 {
        self.rezoom(viewport, ViewTransform::zoom_in)
    }

    pub fn zoom_out(&self, viewport: Size) -> f64 {
        self.rezoom(viewport, ViewTransform::zoom_out)
    }

    fn rezoom(&self, viewport: Size, step: fn(ViewTransform, f64, Size, Size) -> ViewTransform) -> f64 {
        let mut state = self.lock();
        let canvas = bounding_box(&state.tree).canvas_size(self.spacing());
        state.view = step(state.view, self.inner.settings.zoom_step, canvas, viewport);
        state.view.zoom()
    }

    // ════════════════════════════════════════════════════════════════════
    // Teardown
    // ════════════════════════════════════════════════════════════════════

    /// Cancels pending and in-flight work. Later input is ignored.
    pub fn shutdown(&self) {
        let mut state = self.lock();
        state.shut_down = true;
        state.submissions.cancel();
        self.inner.generator.cancel_all();
        self.inner.shutdown.cancel();
        tracing::debug!("Interaction controller shut down");
    }
}

fn select_locked(state: &mut ControllerState, id: &NodeId, path: NodePath) -> ClickOutcome {
    let editing = find_by_id(&state.tree, id).is_some_and(|n| n.is(NodeKind::Action));
    if editing {
        state.editing = Some(id.clone());
    }
    state.selection = path.clone();
    ClickOutcome::Selected { path, editing }
}

/// Puts a chart still in the intake back on the action question.
fn reopen_intake(state: &mut ControllerState) {
    if state.phase != ChartPhase::Intake {
        return;
    }
    state.intake.retry_action();
    state.tree = Arc::new(placeholder_root());
    state.selection = NodePath::root();
    tracing::debug!("Initial generation produced nothing, asking for the action again");
}

fn settle(generation: Generation) -> SubmitOutcome {
    match generation {
        Generation::Completed { outcomes, .. } => SubmitOutcome::Applied {
            outcomes: outcomes.len(),
        },
        Generation::Failed { error, .. } => SubmitOutcome::Failed(error),
        Generation::Cancelled { .. } => SubmitOutcome::Cancelled,
        Generation::Busy => SubmitOutcome::Busy,
        Generation::EmptyAction => SubmitOutcome::EmptyAction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryFlowchartRepository, MockOutcomeService};
    use crate::domain::tree::{node_at_path, Position};

    fn controller(service: MockOutcomeService) -> InteractionController {
        InteractionController::new(
            Arc::new(service),
            Arc::new(InMemoryFlowchartRepository::new()),
            UserId::new("alice@example.com").unwrap(),
            ControllerSettings::default(),
        )
    }

    fn root_id(controller: &InteractionController) -> NodeId {
        controller.snapshot().id().clone()
    }

    fn child_id(controller: &InteractionController, path: &[usize]) -> NodeId {
        let tree = controller.snapshot();
        node_at_path(&tree, &NodePath::from(path.to_vec()))
            .unwrap()
            .id()
            .clone()
    }

    #[tokio::test]
    async fn starts_in_intake_with_placeholder_root() {
        let controller = controller(MockOutcomeService::new());

        assert_eq!(controller.phase(), ChartPhase::Intake);
        assert_eq!(controller.intake_question(), Some(IntakeQuestion::Situation));
        assert!(controller.snapshot().is(NodeKind::Action));
        assert_eq!(controller.snapshot().content(), "");
    }

    #[tokio::test]
    async fn intake_answers_start_the_initial_generation() {
        let service = MockOutcomeService::new().with_outcomes(&[("Left", 60.0), ("Right", 40.0)]);
        let controller = controller(service.clone());

        assert_eq!(
            controller.answer("lost in a maze").await,
            IntakeOutcome::Ask(IntakeQuestion::Action)
        );
        let outcome = controller.answer("go left").await;

        assert_eq!(outcome, IntakeOutcome::Started(SubmitOutcome::Applied { outcomes: 2 }));
        assert_eq!(service.get_calls()[0].query, "lost in a maze\ngo left");
        assert_eq!(controller.phase(), ChartPhase::Rendered);

        let tree = controller.snapshot();
        assert_eq!(tree.content(), "go left");
        assert_eq!(tree.position(), Position::ORIGIN);
        assert_eq!(tree.children()[0].position(), Position::new(300.0, -75.0));
        assert_eq!(controller.outcome_count(), 2);
        assert_eq!(controller.answer("again").await, IntakeOutcome::Closed);
    }

    #[tokio::test]
    async fn skip_seeds_root_without_calling_the_service() {
        let service = MockOutcomeService::new();
        let controller = controller(service.clone());

        assert!(controller.skip());

        assert_eq!(controller.phase(), ChartPhase::Rendered);
        assert_eq!(controller.snapshot().content(), "Default action");
        assert_eq!(controller.situation().as_deref(), Some("Default situation"));
        assert_eq!(controller.editing(), Some(root_id(&controller)));
        assert_eq!(service.call_count(), 0);
        assert!(!controller.skip());
    }

    #[tokio::test]
    async fn single_click_on_action_selects_and_edits() {
        let controller = controller(MockOutcomeService::new());
        controller.skip();
        let root = root_id(&controller);

        let outcome = controller.click(&root, Instant::now());

        assert_eq!(
            outcome,
            ClickOutcome::Selected {
                path: NodePath::root(),
                editing: true
            }
        );
        assert_eq!(controller.editing(), Some(root));
    }

    #[tokio::test]
    async fn double_click_on_outcome_opens_action_and_prunes_siblings() {
        let service = MockOutcomeService::new().with_outcomes(&[("A", 50.0), ("B", 50.0)]);
        let controller = controller(service);
        controller.start("maze", "go").await;

        let first = child_id(&controller, &[0]);
        let second = child_id(&controller, &[1]);
        let opened = controller.open_action(&first).unwrap();

        let t0 = Instant::now();
        controller.click(&second, t0);
        let outcome = controller.click(&second, t0 + Duration::from_millis(100));

        let ClickOutcome::ActionOpened { action } = outcome else {
            panic!("expected an opened action, got {:?}", outcome);
        };
        let tree = controller.snapshot();
        assert!(tree.children()[0].children().is_empty());
        assert_eq!(tree.children()[1].children().len(), 1);
        assert!(find_by_id(&tree, &opened).is_none());

        let action_node = find_by_id(&tree, &action).unwrap();
        assert!(action_node.is(NodeKind::Action));
        assert_eq!(action_node.content(), "");
        assert_eq!(action_node.position(), Position::new(300.0 + 550.0, 75.0));
        assert_eq!(controller.editing(), Some(action));
    }

    #[tokio::test]
    async fn double_click_on_action_only_selects() {
        let controller = controller(MockOutcomeService::new());
        controller.skip();
        let root = root_id(&controller);
        let t0 = Instant::now();

        controller.click(&root, t0);
        let outcome = controller.click(&root, t0 + Duration::from_millis(50));

        assert!(matches!(outcome, ClickOutcome::Selected { .. }));
        assert!(controller.snapshot().is_leaf());
    }

    #[tokio::test]
    async fn click_on_unknown_id_is_stale() {
        let controller = controller(MockOutcomeService::new());
        let ghost = NodeId::new("ghost").unwrap();

        assert_eq!(controller.click(&ghost, Instant::now()), ClickOutcome::Stale);
    }

    #[tokio::test]
    async fn submit_now_attaches_outcomes_and_clears_editing() {
        let service = MockOutcomeService::new().with_outcomes(&[("Left", 70.0), ("Right", 30.0)]);
        let controller = controller(service);
        controller.skip();
        let root = root_id(&controller);

        let outcome = controller.submit_action_now(&root, "go left").await;

        assert_eq!(outcome, SubmitOutcome::Applied { outcomes: 2 });
        let tree = controller.snapshot();
        assert_eq!(tree.content(), "go left");
        assert_eq!(tree.children().len(), 2);
        assert_eq!(controller.editing(), None);
    }

    #[tokio::test]
    async fn failed_submission_keeps_tree_and_editing() {
        let service = MockOutcomeService::new().with_error(InferenceError::status(500, "down"));
        let controller = controller(service);
        controller.skip();
        let root = root_id(&controller);
        let before = controller.snapshot();

        let outcome = controller.submit_action_now(&root, "go left").await;

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert!(Arc::ptr_eq(&before, &controller.snapshot()));
        assert_eq!(controller.editing(), Some(root));
        assert_eq!(controller.outcome_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn outcomes_for_a_pruned_action_are_dropped_without_counting() {
        let service = MockOutcomeService::new()
            .with_outcomes(&[("A", 50.0), ("B", 50.0)])
            .with_outcomes_after(&[("late", 100.0)], Duration::from_millis(500));
        let controller = controller(service);
        controller.start("maze", "go").await;
        let first = child_id(&controller, &[0]);
        let second = child_id(&controller, &[1]);
        let action = controller.open_action(&first).unwrap();

        let submission = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit_action_now(&action, "x").await })
        };
        tokio::task::yield_now().await;
        assert!(controller.is_generating());
        controller.open_action(&second).unwrap();

        assert_eq!(submission.await.unwrap(), SubmitOutcome::Stale);
        let tree = controller.snapshot();
        assert!(tree.children()[0].children().is_empty());
        assert_eq!(count_outcomes(&tree), 2);
        assert_eq!(controller.outcome_count(), 2);
    }

    #[tokio::test]
    async fn failed_initial_generation_asks_for_the_action_again() {
        let service = MockOutcomeService::new()
            .with_error(InferenceError::status(503, "down"))
            .with_outcomes(&[("Left", 60.0), ("Right", 40.0)]);
        let controller = controller(service.clone());
        controller.answer("lost in a maze").await;

        let outcome = controller.answer("go left").await;

        assert!(matches!(outcome, IntakeOutcome::Started(SubmitOutcome::Failed(_))));
        assert_eq!(controller.phase(), ChartPhase::Intake);
        assert_eq!(controller.intake_question(), Some(IntakeQuestion::Action));
        assert_eq!(controller.outcome_count(), 0);
        assert!(controller.snapshot().is_leaf());

        let retried = controller.answer("go right").await;

        assert_eq!(retried, IntakeOutcome::Started(SubmitOutcome::Applied { outcomes: 2 }));
        assert_eq!(service.get_calls()[1].query, "lost in a maze\ngo right");
        assert_eq!(controller.phase(), ChartPhase::Rendered);
    }

    #[tokio::test]
    async fn empty_initial_generation_stays_in_intake() {
        let controller = controller(MockOutcomeService::new().with_outcomes(&[]));

        let outcome = controller.start("maze", "go").await;

        assert_eq!(outcome, SubmitOutcome::Applied { outcomes: 0 });
        assert_eq!(controller.phase(), ChartPhase::Intake);
        assert!(controller.skip());
    }

    #[test]
    fn settings_give_generation_room_for_retries() {
        let mut config = AppConfig::default();
        config.inference.timeout_secs = 2;
        config.inference.max_retries = 1;
        config.inference.retry_backoff_ms = 250;

        let settings = ControllerSettings::from_config(&config);

        assert_eq!(settings.generation_timeout, Duration::from_millis(4_250));
    }

    #[tokio::test]
    async fn submitting_on_an_outcome_is_rejected() {
        let service = MockOutcomeService::new().with_outcomes(&[("A", 100.0)]);
        let controller = controller(service.clone());
        controller.start("maze", "go").await;
        let outcome_id = child_id(&controller, &[0]);

        let outcome = controller.submit_action_now(&outcome_id, "wait").await;

        assert_eq!(outcome, SubmitOutcome::NotAnAction);
        assert_eq!(service.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_submissions_coalesce_into_the_last() {
        let service = MockOutcomeService::new().with_outcomes(&[("A", 100.0)]);
        let controller = controller(service.clone());
        controller.skip();
        let root = root_id(&controller);

        let t0 = Instant::now();
        controller.submit_action(root.clone(), "first", t0);
        controller.submit_action(root.clone(), "second", t0);
        controller.submit_action(root.clone(), "third", t0);

        let outcome = controller.run_pending_submission().await;

        assert_eq!(outcome, Some(SubmitOutcome::Applied { outcomes: 1 }));
        assert_eq!(service.call_count(), 1);
        assert_eq!(service.get_calls()[0].query, "third");
        assert_eq!(controller.run_pending_submission().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_pending_submission() {
        let service = MockOutcomeService::new().with_outcomes(&[("A", 100.0)]);
        let controller = controller(service.clone());
        controller.skip();
        let root = root_id(&controller);

        controller.submit_action(root, "go", Instant::now());
        let driver = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.run_pending_submission().await })
        };
        tokio::task::yield_now().await;

        controller.shutdown();

        assert_eq!(driver.await.unwrap(), None);
        assert_eq!(service.call_count(), 0);
        assert_eq!(controller.click(&NodeId::new("x").unwrap(), Instant::now()), ClickOutcome::Ignored);
    }

    #[tokio::test(start_paused = true)]
    async fn load_discards_in_flight_generation() {
        let service = MockOutcomeService::new()
            .with_outcomes_after(&[("late", 50.0)], Duration::from_secs(2));
        let controller = controller(service);
        controller.skip();
        let saved = controller.save().await.unwrap();
        let root = root_id(&controller);

        let submission = {
            let controller = controller.clone();
            let root = root.clone();
            tokio::spawn(async move { controller.submit_action_now(&root, "go").await })
        };
        tokio::task::yield_now().await;
        assert!(controller.is_generating());

        controller.load(saved).await.unwrap();

        assert_eq!(submission.await.unwrap(), SubmitOutcome::Cancelled);
        assert!(controller.snapshot().is_leaf());
        assert_eq!(controller.outcome_count(), 0);
    }

    #[tokio::test]
    async fn save_load_and_history_round_trip() {
        let service = MockOutcomeService::new().with_outcomes(&[("A", 50.0), ("B", 50.0)]);
        let controller = controller(service);
        controller.start("maze", "go").await;
        let saved_tree = controller.snapshot();

        let id = controller.save().await.unwrap();
        controller.drag(&root_id(&controller), Position::new(5.0, 5.0));
        controller.load(id).await.unwrap();

        assert_eq!(*controller.snapshot(), *saved_tree);
        assert_eq!(controller.outcome_count(), 2);
        assert_eq!(controller.selection(), NodePath::root());
        assert_eq!(controller.editing(), None);

        let history = controller.history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, id);
    }

    #[tokio::test]
    async fn load_unknown_flowchart_keeps_current_tree() {
        let controller = controller(MockOutcomeService::new());
        controller.skip();
        let before = controller.snapshot();

        let result = controller.load(FlowchartId::new()).await;

        assert!(matches!(
            result,
            Err(ControllerError::Repository(RepositoryError::NotFound(_)))
        ));
        assert!(Arc::ptr_eq(&before, &controller.snapshot()));
    }

    #[tokio::test]
    async fn drag_moves_only_the_node() {
        let service = MockOutcomeService::new().with_outcomes(&[("A", 100.0)]);
        let controller = controller(service);
        controller.start("maze", "go").await;
        let root = root_id(&controller);
        let child_before = controller.snapshot().children()[0].position();

        assert!(controller.drag(&root, Position::new(-40.0, 20.0)));

        let tree = controller.snapshot();
        assert_eq!(tree.position(), Position::new(-40.0, 20.0));
        assert_eq!(tree.children()[0].position(), child_before);
        assert!(!controller.drag(&NodeId::new("ghost").unwrap(), Position::ORIGIN));
    }

    #[tokio::test]
    async fn expand_projects_outcome_detail() {
        let service = MockOutcomeService::new().with_outcomes(&[("Left", 70.0)]);
        let controller = controller(service);
        controller.start("maze", "go").await;
        let outcome_id = child_id(&controller, &[0]);

        let detail = controller.expand(&outcome_id).unwrap();

        assert_eq!(detail.title, "Left");
        assert_eq!(detail.probability, 70.0);
        assert_eq!(detail.option_number, 1);
        assert!(controller.expand(&root_id(&controller)).is_none());
    }

    #[tokio::test]
    async fn zoom_out_is_clamped_to_fit() {
        let controller = controller(MockOutcomeService::new());
        controller.skip();
        // Single root: canvas is 200+550 by 100+150.
        let viewport = Size::new(375.0, 500.0);

        assert!((controller.zoom_in(viewport) - 1.2).abs() < 1e-9);
        for _ in 0..10 {
            controller.zoom_out(viewport);
        }

        assert!((controller.zoom() - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn scene_marks_selected_path() {
        let service = MockOutcomeService::new().with_outcomes(&[("A", 50.0), ("B", 50.0)]);
        let controller = controller(service);
        controller.start("maze", "go").await;
        let second = child_id(&controller, &[1]);
        controller.click(&second, Instant::now());

        let scene = controller.scene();

        let selected: Vec<_> = scene.nodes.iter().filter(|n| n.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, second);
        assert_eq!(scene.edges.iter().filter(|e| e.highlighted).count(), 1);
    }
}
