//! Console presentation of battle events.
//!
//! The presenter is an [`EventSink`]: the controller calls it synchronously,
//! so lines appear in exactly the order events happen.

use std::collections::HashMap;
use std::io::{self, Stdout, Write};
use std::sync::Mutex;

use crossterm::style::{Color, Stylize};
use game_core::{BattleOutcome, CombatantId, DrawReason};
use runtime::{BattleEvent, CombatantStatus, DecisionSource, EffectRecord, EventSink};

use crate::config::UiConfig;

/// What the presenter remembers about a combatant between events.
#[derive(Clone, Debug)]
struct Entry {
    name: String,
    max_hp: u32,
}

/// Turns battle events into styled text lines.
#[derive(Debug, Default)]
pub struct Renderer {
    color: bool,
    show_fingerprints: bool,
    combatants: HashMap<CombatantId, Entry>,
}

impl Renderer {
    pub fn new(ui: &UiConfig) -> Self {
        Self {
            color: ui.color,
            show_fingerprints: ui.show_fingerprints,
            combatants: HashMap::new(),
        }
    }

    fn paint(&self, text: String, color: Color) -> String {
        if self.color {
            text.with(color).to_string()
        } else {
            text
        }
    }

    fn bold(&self, text: String) -> String {
        if self.color { text.bold().to_string() } else { text }
    }

    fn name(&self, id: CombatantId) -> String {
        self.combatants
            .get(&id)
            .map(|entry| entry.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn max_hp(&self, id: CombatantId) -> u32 {
        self.combatants.get(&id).map_or(0, |entry| entry.max_hp)
    }

    fn status_line(&self, status: &CombatantStatus) -> String {
        let hp = format!("{}/{}", status.current_hp, status.max_hp);
        let hp = if !status.is_alive {
            self.paint("down".to_string(), Color::DarkGrey)
        } else if u64::from(status.current_hp) * 4 < u64::from(status.max_hp) {
            self.paint(hp, Color::Red)
        } else {
            self.paint(hp, Color::Green)
        };
        let stance = if status.is_defending { " (defending)" } else { "" };
        format!("  {:<16} [{}] {}{}", status.name, status.team_name, hp, stance)
    }

    /// Lines to print for one event; empty when the event is not shown.
    pub fn render(&mut self, event: &BattleEvent) -> Vec<String> {
        match event {
            BattleEvent::BattleStarted { teams, combatants } => {
                self.combatants = combatants
                    .iter()
                    .map(|status| {
                        let entry = Entry {
                            name: status.name.clone(),
                            max_hp: status.max_hp,
                        };
                        (status.id, entry)
                    })
                    .collect();

                let mut lines = vec![self.bold("=== Battle start ===".to_string())];
                for team in teams {
                    lines.push(format!("{} ({})", self.bold(team.name.clone()), team.controller));
                    lines.extend(
                        combatants
                            .iter()
                            .filter(|status| status.team == team.id)
                            .map(|status| self.status_line(status)),
                    );
                }
                lines
            }

            BattleEvent::RoundStarted { round, order } => {
                let order: Vec<String> = order.iter().map(|id| self.name(*id)).collect();
                vec![
                    String::new(),
                    self.paint(format!("--- Round {round} ---"), Color::Cyan),
                    format!("Order: {}", order.join(", ")),
                ]
            }

            BattleEvent::TurnStarted { .. } => Vec::new(),

            BattleEvent::ActionTaken {
                actor_name,
                ability_name,
                target,
                target_name,
                actor,
                source,
                ..
            } => {
                let aim = if target == actor {
                    String::new()
                } else {
                    format!(" on {target_name}")
                };
                let note = match source {
                    DecisionSource::Fallback => self.paint(" [auto]".to_string(), Color::DarkGrey),
                    _ => String::new(),
                };
                vec![format!(
                    "{} uses {}{}{}",
                    self.bold(actor_name.clone()),
                    ability_name,
                    aim,
                    note
                )]
            }

            BattleEvent::EffectApplied { effect, .. } => {
                let line = match effect {
                    EffectRecord::Damaged { target, outcome } => format!(
                        "  {} takes {} damage ({}/{} HP)",
                        self.name(*target),
                        self.paint(outcome.dealt.to_string(), Color::Red),
                        outcome.remaining_hp,
                        self.max_hp(*target)
                    ),
                    EffectRecord::Healed { target, outcome } => format!(
                        "  {} recovers {} HP ({}/{} HP)",
                        self.name(*target),
                        self.paint(outcome.restored.to_string(), Color::Green),
                        outcome.current_hp,
                        self.max_hp(*target)
                    ),
                    EffectRecord::Moved { target, to, .. } => {
                        format!("  {} moves to {}", self.name(*target), to)
                    }
                    EffectRecord::Defended { target } => {
                        format!("  {} takes a defensive stance", self.name(*target))
                    }
                };
                vec![line]
            }

            BattleEvent::DecisionFallback {
                actor_name, reason, ..
            } => vec![self.paint(
                format!("  ({actor_name} hesitates: {reason})"),
                Color::DarkGrey,
            )],

            BattleEvent::ScriptFailed {
                actor_name, error, ..
            } => vec![self.paint(
                format!("  ! {error}; {actor_name} falls back to a basic attack"),
                Color::Yellow,
            )],

            BattleEvent::NoAction { actor_name, .. } => {
                vec![format!("{actor_name} has nothing to do")]
            }

            BattleEvent::CombatantDefeated {
                name, team_name, ..
            } => vec![self.paint(
                format!("  {name} ({team_name}) is defeated!"),
                Color::Magenta,
            )],

            BattleEvent::RoundEnded {
                status,
                fingerprint,
                ..
            } => {
                let mut lines: Vec<String> = status
                    .iter()
                    .filter(|status| status.is_alive)
                    .map(|status| self.status_line(status))
                    .collect();
                if self.show_fingerprints {
                    lines.push(self.paint(format!("  state {fingerprint}"), Color::DarkGrey));
                }
                lines
            }

            BattleEvent::BattleEnded {
                outcome, rounds, ..
            } => {
                let headline = match outcome {
                    BattleOutcome::Victory { name, .. } => format!("{name} win"),
                    BattleOutcome::Draw {
                        reason: DrawReason::MutualElimination,
                    } => "Draw: no one is left standing".to_string(),
                    BattleOutcome::Draw {
                        reason: DrawReason::RoundLimit,
                    } => "Draw: round limit reached".to_string(),
                };
                let plural = if *rounds == 1 { "" } else { "s" };
                vec![
                    String::new(),
                    self.bold(format!("=== {headline} after {rounds} round{plural} ===")),
                ]
            }
        }
    }
}

/// Event sink printing a readable battle log.
pub struct ConsolePresenter<W: Write + Send> {
    inner: Mutex<(Renderer, W)>,
}

impl ConsolePresenter<Stdout> {
    pub fn stdout(ui: &UiConfig) -> Self {
        Self::new(ui, io::stdout())
    }
}

impl<W: Write + Send> ConsolePresenter<W> {
    pub fn new(ui: &UiConfig, out: W) -> Self {
        Self {
            inner: Mutex::new((Renderer::new(ui), out)),
        }
    }

    pub fn into_inner(self) -> Option<W> {
        self.inner.into_inner().ok().map(|(_, out)| out)
    }
}

impl<W: Write + Send> EventSink for ConsolePresenter<W> {
    fn emit(&self, event: &BattleEvent) {
        let Ok(mut guard) = self.inner.lock() else {
            return;
        };
        let (renderer, out) = &mut *guard;

        let written = renderer
            .render(event)
            .iter()
            .try_for_each(|line| writeln!(out, "{line}"))
            .and_then(|()| out.flush());

        if let Err(err) = written {
            tracing::warn!("failed to write to console: {}", err);
        }
    }
}
