//! Top-level battle state machine.
//!
//! The controller owns the battle state exclusively and drives it from setup
//! through the round loop to a single reported outcome. Collaborators (script
//! host, player input, event sinks) are injected through
//! [`BattleControllerBuilder`].

use std::sync::Arc;

use game_core::{BattleOutcome, BattleState, Roster, RulesConfig, compute_turn_order, setup_battle};
use tokio::sync::broadcast;

use crate::api::{PlayerInput, Result, RuntimeError};
use crate::events::{BattleEvent, CombatantStatus, EventBus, EventSink, FanoutSink, TeamSummary, Topic};
use crate::resolver::ActionResolver;
use crate::script::ScriptHost;

/// Runtime tunables shared by the controller and its collaborators.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    pub rules: RulesConfig,
    /// Capacity of each topic channel on the event bus.
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            rules: RulesConfig::default(),
            event_buffer_size: EventBus::DEFAULT_CAPACITY,
        }
    }
}

/// Final result of a battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    /// Rounds started, the last one included even if it ended early.
    pub rounds: u32,
    pub survivors: Vec<CombatantStatus>,
    /// Hex SHA-256 of the final battle state.
    pub fingerprint: String,
}

/// Drives one battle from the first round to its outcome.
pub struct BattleController {
    config: RuntimeConfig,
    state: BattleState,
    resolver: ActionResolver,
    bus: EventBus,
    sink: Arc<FanoutSink>,
}

impl BattleController {
    /// Create a new controller builder
    pub fn builder() -> BattleControllerBuilder {
        BattleControllerBuilder::new()
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Subscribe to one topic of the event bus.
    ///
    /// Subscribers that fall behind lose the oldest events; use a sink for a
    /// lossless, ordered stream.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<BattleEvent> {
        self.bus.subscribe(topic)
    }

    /// Runs rounds until one team is left, every team is gone, or the round
    /// limit is reached.
    pub async fn run(&mut self) -> Result<BattleReport> {
        tracing::info!(
            teams = self.state.teams().len(),
            combatants = self.state.combatants().len(),
            max_rounds = self.config.rules.max_rounds,
            "battle started"
        );
        self.sink.emit(&BattleEvent::BattleStarted {
            teams: self.state.teams().iter().map(TeamSummary::from).collect(),
            combatants: self.status(),
        });

        let outcome = loop {
            if let Some(outcome) = self.state.outcome() {
                break outcome;
            }

            let round = self.state.round();
            self.play_round(round).await;

            let fingerprint = hex::encode(self.state.fingerprint());
            tracing::debug!(round, %fingerprint, "round ended");
            self.sink.emit(&BattleEvent::RoundEnded {
                round,
                status: self.status(),
                fingerprint,
            });

            if let Some(outcome) = self.state.outcome() {
                break outcome;
            }
            if round >= self.config.rules.max_rounds {
                tracing::warn!(round, "round limit reached");
                break BattleOutcome::round_limit();
            }
            self.state.advance_round();
        };

        let report = BattleReport {
            outcome,
            rounds: self.state.round(),
            survivors: self
                .state
                .living()
                .map(CombatantStatus::from)
                .collect(),
            fingerprint: hex::encode(self.state.fingerprint()),
        };

        tracing::info!(outcome = ?report.outcome, rounds = report.rounds, "battle ended");
        self.sink.emit(&BattleEvent::BattleEnded {
            outcome: report.outcome.clone(),
            rounds: report.rounds,
            survivors: report.survivors.clone(),
            fingerprint: report.fingerprint.clone(),
        });

        Ok(report)
    }

    async fn play_round(&mut self, round: u32) {
        let order = compute_turn_order(self.state.combatants(), self.config.rules.tie_break, round);
        tracing::debug!(round, ?order, "round started");
        self.sink.emit(&BattleEvent::RoundStarted {
            round,
            order: order.clone(),
        });

        for actor in order {
            self.resolver.resolve_turn(&mut self.state, actor).await;
            if self.state.is_terminal() {
                break;
            }
        }
    }

    fn status(&self) -> Vec<CombatantStatus> {
        self.state
            .combatants()
            .iter()
            .map(CombatantStatus::from)
            .collect()
    }
}

/// Builder for [`BattleController`].
pub struct BattleControllerBuilder {
    config: RuntimeConfig,
    roster: Option<Roster>,
    teams: Vec<String>,
    script_host: Option<Arc<dyn ScriptHost>>,
    player_input: Option<Arc<dyn PlayerInput>>,
    sinks: FanoutSink,
}

impl BattleControllerBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            roster: None,
            teams: Vec::new(),
            script_host: None,
            player_input: None,
            sinks: FanoutSink::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn rules(mut self, rules: RulesConfig) -> Self {
        self.config.rules = rules;
        self
    }

    /// Set required roster
    pub fn roster(mut self, roster: Roster) -> Self {
        self.roster = Some(roster);
        self
    }

    /// Team ids to field, in team order.
    pub fn teams<I, S>(mut self, teams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.teams = teams.into_iter().map(Into::into).collect();
        self
    }

    /// Set required script host
    pub fn script_host(mut self, host: impl ScriptHost + 'static) -> Self {
        self.script_host = Some(Arc::new(host));
        self
    }

    /// Set player input (optional)
    ///
    /// Without it, player-controlled combatants are decided by the built-in AI.
    pub fn player_input(mut self, input: impl PlayerInput + 'static) -> Self {
        self.player_input = Some(Arc::new(input));
        self
    }

    /// Add an event sink. Sinks receive every event in emission order.
    pub fn sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    /// Sets up the battle; fails on any invalid roster reference or team selection.
    pub fn build(self) -> Result<BattleController> {
        let roster = self.roster.ok_or(RuntimeError::MissingRoster)?;
        let scripts = self.script_host.ok_or(RuntimeError::MissingScriptHost)?;

        let state = setup_battle(&roster, &self.teams)?;

        let bus = EventBus::with_capacity(self.config.event_buffer_size);
        let mut sinks = self.sinks;
        sinks.push(Arc::new(bus.clone()));
        let sink = Arc::new(sinks);

        let resolver = ActionResolver::new(
            Arc::new(roster.abilities),
            scripts,
            self.player_input,
            sink.clone(),
        );

        Ok(BattleController {
            config: self.config,
            state,
            resolver,
            bus,
            sink,
        })
    }
}
