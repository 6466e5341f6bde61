//! Reconciliation engine.
//!
//! Wraps a [`MappingState`] and notifies observers after every transition.
//! Each transition commits before any observer runs, so an observer that
//! fails (returns an error or panics) cannot leave the state half-updated,
//! and its failure is contained here rather than returned to the caller.
//!
//! Observers never borrow the engine. To react to a change with another
//! change they queue commands in [`Requests`]; the engine applies those after
//! the notification round, one transition at a time, each followed by its own
//! notifications. The number of queued commands applied per caller action is
//! capped by [`EngineConfig::max_cascade`].

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};

use tally_model::{Mapping, SystemColumnId, ValidationResult};

use crate::command::MappingCommand;
use crate::config::EngineConfig;
use crate::error::ObserverError;
use crate::resolver::SuggestionResolver;
use crate::state::{MappingConfig, MappingState};
use crate::validate::validate;

/// Follow-up commands queued by observers during a notification round.
#[derive(Debug, Default)]
pub struct Requests {
    queue: Vec<MappingCommand>,
}

impl Requests {
    /// Queue a `set_mapping`.
    pub fn set(&mut self, source_column: impl Into<String>, target: Option<SystemColumnId>) {
        self.queue.push(MappingCommand::set(source_column, target));
    }

    /// Queue a `remove_mapping`.
    pub fn remove(&mut self, system_column: SystemColumnId) {
        self.queue.push(MappingCommand::Remove(system_column));
    }

    /// Queue an arbitrary command.
    pub fn push(&mut self, command: MappingCommand) {
        self.queue.push(command);
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Receives change notifications from a [`ReconciliationEngine`].
///
/// Both methods are called once per transition: `on_mappings` for every
/// observer first, then `on_validity` for every observer.
pub trait MappingObserver {
    /// Full mapping list after the transition.
    fn on_mappings(
        &mut self,
        mappings: &[Mapping],
        requests: &mut Requests,
    ) -> Result<(), ObserverError> {
        let _ = (mappings, requests);
        Ok(())
    }

    /// Validity after the transition.
    fn on_validity(&mut self, valid: bool, requests: &mut Requests) -> Result<(), ObserverError> {
        let _ = (valid, requests);
        Ok(())
    }
}

/// Mapping state plus change notification.
pub struct ReconciliationEngine {
    state: MappingState,
    resolver: SuggestionResolver,
    config: EngineConfig,
    observers: Vec<Box<dyn MappingObserver>>,
    pending: VecDeque<MappingCommand>,
    failed_notifications: usize,
    dropped_requests: usize,
}

impl ReconciliationEngine {
    /// Create an engine with an empty mapping set.
    pub fn new(resolver: SuggestionResolver, config: EngineConfig) -> Self {
        Self {
            state: MappingState::default().with_policy(config.uniqueness),
            resolver,
            config,
            observers: Vec::new(),
            pending: VecDeque::new(),
            failed_notifications: 0,
            dropped_requests: 0,
        }
    }

    /// Register an observer. Observers are notified in registration order.
    pub fn subscribe(&mut self, observer: Box<dyn MappingObserver>) {
        self.observers.push(observer);
    }

    /// Build the mapping set for `source_columns` and notify observers.
    ///
    /// See [`MappingState::initialize`] for how `seed` is used.
    pub fn initialize<S: AsRef<str>>(
        &mut self,
        source_columns: &[S],
        seed: Option<&[Mapping]>,
    ) -> &[Mapping] {
        self.state = MappingState::initialize(source_columns, seed, &self.resolver)
            .with_policy(self.config.uniqueness);
        tracing::info!(
            columns = self.state.len(),
            required_mapped = self.state.summary().required_mapped,
            "Mapping initialized"
        );
        self.notify();
        self.drain_requests();
        self.state.mappings()
    }

    /// Set or clear the target of a source column.
    ///
    /// Returns true if the state changed. Observers are only notified on change.
    pub fn set_mapping(&mut self, source_column: &str, target: Option<SystemColumnId>) -> bool {
        self.run(MappingCommand::set(source_column, target))
    }

    /// Clear whichever source column holds `system_column`.
    ///
    /// Returns false, without notifying, if it was not mapped.
    pub fn remove_mapping(&mut self, system_column: SystemColumnId) -> bool {
        self.run(MappingCommand::Remove(system_column))
    }

    /// Apply a command as a caller-initiated transition.
    pub fn apply(&mut self, command: MappingCommand) -> bool {
        self.run(command)
    }

    /// Current mappings in input order.
    pub fn mappings(&self) -> &[Mapping] {
        self.state.mappings()
    }

    /// Underlying mapping state.
    pub fn state(&self) -> &MappingState {
        &self.state
    }

    /// Suggestion resolver used by [`Self::initialize`].
    pub fn resolver(&self) -> &SuggestionResolver {
        &self.resolver
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate the current mappings.
    pub fn validation(&self) -> ValidationResult {
        self.state.validation()
    }

    /// Missing required columns with descriptions.
    pub fn missing_required_details(&self) -> Vec<(SystemColumnId, &'static str)> {
        self.validation().missing_descriptions()
    }

    /// Targets that may be offered for `source_column`.
    pub fn selectable_targets(&self, source_column: &str) -> Vec<SystemColumnId> {
        self.state.selectable_targets(source_column)
    }

    /// Serializable snapshot of the current mapping.
    pub fn to_config(&self) -> MappingConfig {
        self.state.to_config()
    }

    /// Observer calls that failed since the engine was created.
    pub fn failed_notifications(&self) -> usize {
        self.failed_notifications
    }

    /// Observer requests dropped because the cascade limit was reached.
    pub fn dropped_requests(&self) -> usize {
        self.dropped_requests
    }

    fn run(&mut self, command: MappingCommand) -> bool {
        let changed = self.commit(command);
        if changed {
            self.notify();
        }
        self.drain_requests();
        changed
    }

    fn commit(&mut self, command: MappingCommand) -> bool {
        match command {
            MappingCommand::Set {
                source_column,
                target,
            } => self.state.set_mapping(&source_column, target),
            MappingCommand::Remove(system_column) => self.state.remove_mapping(system_column),
        }
    }

    fn drain_requests(&mut self) {
        let mut applied = 0;
        while let Some(command) = self.pending.pop_front() {
            if applied >= self.config.max_cascade {
                let dropped = self.pending.len() + 1;
                self.dropped_requests += dropped;
                self.pending.clear();
                tracing::warn!(
                    dropped,
                    limit = self.config.max_cascade,
                    "Observer requests dropped: cascade limit reached"
                );
                break;
            }
            applied += 1;
            if self.commit(command) {
                self.notify();
            }
        }
    }

    fn notify(&mut self) {
        let mappings = self.state.mappings();
        let valid = validate(mappings).valid;
        let mut requests = Requests::default();

        for (index, observer) in self.observers.iter_mut().enumerate() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                observer.on_mappings(mappings, &mut requests)
            }));
            if !contained(index, "on_mappings", outcome) {
                self.failed_notifications += 1;
            }
        }
        for (index, observer) in self.observers.iter_mut().enumerate() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                observer.on_validity(valid, &mut requests)
            }));
            if !contained(index, "on_validity", outcome) {
                self.failed_notifications += 1;
            }
        }

        self.pending.extend(requests.queue);
    }
}

/// Log an observer failure. Returns true if the call succeeded.
fn contained(
    index: usize,
    callback: &'static str,
    outcome: std::thread::Result<Result<(), ObserverError>>,
) -> bool {
    match outcome {
        Ok(Ok(())) => true,
        Ok(Err(err)) => {
            tracing::warn!(observer = index, callback, error = %err, "Observer failed");
            false
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            tracing::warn!(observer = index, callback, panic = %message, "Observer panicked");
            false
        }
    }
}
