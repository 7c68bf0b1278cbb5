use crate::battle::state::{
    ActionFailureReason, BattleAction, BattleEvent, BattleKind, BattleOutcome, BattlePhase,
    EventBus, TurnOutcome, TurnRng,
};
use crate::errors::{BattleError, BattleResult};
use crate::inventory::ItemError;
use crate::pokemon::Pokemon;
use crate::trainer::Trainer;

/// Hard ceiling on battle length; hitting it forces a draw.
pub const MAX_TURNS: u32 = 100;

/// Chance (out of 100) of escaping a wild encounter.
pub const RUN_CHANCE: u8 = 80;

/// A single battle from start to terminal outcome.
///
/// The battle exclusively borrows the trainer for its whole lifetime, so
/// the roster can never be touched from outside while a battle is running.
/// It suspends only at the decision points: `resolve_action` for a normal
/// turn, `resolve_replacement` after a faint.
#[derive(Debug)]
pub struct Battle<'a> {
    pub(crate) trainer: &'a mut Trainer,
    pub(crate) opponent: Pokemon,
    pub(crate) kind: BattleKind,
    pub(crate) turn_number: u32,
    pub(crate) phase: BattlePhase,
    pub(crate) active_index: usize,
}

impl<'a> Battle<'a> {
    /// Start a battle. Fails with `NoUsablePokemon` before anything else
    /// happens when the whole party is fainted.
    pub fn new(
        trainer: &'a mut Trainer,
        mut opponent: Pokemon,
        kind: BattleKind,
        events: &mut EventBus,
    ) -> BattleResult<Self> {
        let active_index = trainer.first_usable().ok_or(BattleError::NoUsablePokemon)?;

        // Transient stage modifiers never carry over between battles.
        for pokemon in trainer.party_mut() {
            pokemon.stages.reset();
        }
        opponent.stages.reset();

        events.push(BattleEvent::BattleStarted {
            player: trainer.party()[active_index].nickname.clone(),
            opponent: opponent.nickname.clone(),
            kind,
        });

        Ok(Battle {
            trainer,
            opponent,
            kind,
            turn_number: 0,
            phase: BattlePhase::AwaitingAction,
            active_index,
        })
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn kind(&self) -> BattleKind {
        self.kind
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active(&self) -> &Pokemon {
        &self.trainer.party()[self.active_index]
    }

    pub fn opponent(&self) -> &Pokemon {
        &self.opponent
    }

    pub fn trainer(&self) -> &Trainer {
        &*self.trainer
    }

    /// Tear the battle down, yielding the opposing creature (for the
    /// post-battle capture attempt).
    pub fn into_opponent(self) -> Pokemon {
        self.opponent
    }

    /// Resolve one player action.
    ///
    /// Every failure mode inside the turn is contained here: invalid
    /// selections come back as `Retry` with an `ActionFailed` event, and
    /// unexpected faults are logged and also surface as `Retry`, leaving
    /// the battle in its pre-turn state. The turn counter advances only
    /// when a turn actually completes.
    pub fn resolve_action(
        &mut self,
        action: BattleAction,
        rng: &mut TurnRng,
        events: &mut EventBus,
    ) -> TurnOutcome {
        match self.phase {
            BattlePhase::Ended(outcome) => return TurnOutcome::Ended(outcome),
            BattlePhase::AwaitingReplacement => return TurnOutcome::Retry,
            BattlePhase::AwaitingAction => {}
        }
        // A forced replacement on the final turn can leave the battle alive
        // at the ceiling; it draws before another turn starts.
        if self.turn_number >= MAX_TURNS {
            return self.finish(BattleOutcome::Draw, events);
        }

        match self.try_resolve(action, rng, events) {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::warn!(
                    turn = self.turn_number,
                    %error,
                    "turn faulted; retrying from the pre-turn state"
                );
                events.push(BattleEvent::ActionFailed {
                    reason: ActionFailureReason::TurnFaulted,
                });
                TurnOutcome::Retry
            }
        }
    }

    fn try_resolve(
        &mut self,
        action: BattleAction,
        rng: &mut TurnRng,
        events: &mut EventBus,
    ) -> BattleResult<TurnOutcome> {
        match action {
            BattleAction::Fight { move_index } => {
                let active = self
                    .trainer
                    .party_mut()
                    .get_mut(self.active_index)
                    .ok_or(BattleError::InvalidPartySlot(self.active_index))?;

                let Some(instance) = active.moves.get_mut(move_index) else {
                    events.push(BattleEvent::ActionFailed {
                        reason: ActionFailureReason::InvalidMoveSlot,
                    });
                    return Ok(TurnOutcome::Retry);
                };
                if !instance.use_move() {
                    events.push(BattleEvent::ActionFailed {
                        reason: ActionFailureReason::NoPpRemaining,
                    });
                    return Ok(TurnOutcome::Retry);
                }
                let template = instance.template.clone();
                let attacker = active.nickname.clone();

                events.push(BattleEvent::MoveUsed {
                    attacker: attacker.clone(),
                    move_name: template.name.clone(),
                });

                if !rng.chance(template.accuracy, "player accuracy") {
                    events.push(BattleEvent::MoveMissed { attacker });
                } else {
                    let roll = {
                        let attacker = &self.trainer.party()[self.active_index];
                        attacker.damage_against(&template, &self.opponent, rng)
                    };
                    self.opponent.take_damage(roll.amount);
                    events.push(BattleEvent::DamageDealt {
                        target: self.opponent.nickname.clone(),
                        amount: roll.amount,
                        remaining_hp: self.opponent.current_hp(),
                    });
                    if !template.is_status_move() && roll.effectiveness != 1.0 {
                        events.push(BattleEvent::Effectiveness {
                            multiplier: roll.effectiveness,
                        });
                    }

                    if self.opponent.is_fainted() {
                        events.push(BattleEvent::Fainted {
                            name: self.opponent.nickname.clone(),
                        });
                        self.award_experience(events)?;
                        return Ok(self.finish(BattleOutcome::Victory, events));
                    }
                }
            }

            BattleAction::UseItem { item } => {
                match self.trainer.use_battle_item(&item, self.active_index) {
                    Ok(effect) => {
                        let target = self.trainer.party()[self.active_index].nickname.clone();
                        events.push(BattleEvent::ItemUsed { item, target, effect });
                    }
                    Err(ItemError::NoEffect(_)) => {
                        events.push(BattleEvent::ActionFailed {
                            reason: ActionFailureReason::ItemHadNoEffect,
                        });
                        return Ok(TurnOutcome::Retry);
                    }
                    Err(_) => {
                        events.push(BattleEvent::ActionFailed {
                            reason: ActionFailureReason::NoSuchItem,
                        });
                        return Ok(TurnOutcome::Retry);
                    }
                }
            }

            BattleAction::Switch { team_index } => {
                if self.trainer.party().len() < 2 {
                    events.push(BattleEvent::ActionFailed {
                        reason: ActionFailureReason::NoOtherPokemon,
                    });
                    return Ok(TurnOutcome::Retry);
                }
                if !self.switch_target_is_valid(team_index) {
                    events.push(BattleEvent::ActionFailed {
                        reason: ActionFailureReason::InvalidSwitchTarget,
                    });
                    return Ok(TurnOutcome::Retry);
                }
                let replaced = self.trainer.party()[self.active_index].nickname.clone();
                self.trainer.party_mut()[self.active_index].stages.reset();
                self.active_index = team_index;
                events.push(BattleEvent::SwitchedIn {
                    name: self.trainer.party()[team_index].nickname.clone(),
                    replaced,
                });
                // The opponent still acts: the incoming creature takes
                // immediate fire, with no one-turn protection.
            }

            BattleAction::Run => {
                if self.kind == BattleKind::Trainer {
                    events.push(BattleEvent::ActionFailed {
                        reason: ActionFailureReason::CannotRunFromTrainer,
                    });
                    return Ok(TurnOutcome::Retry);
                }
                if rng.chance(RUN_CHANCE, "escape attempt") {
                    events.push(BattleEvent::RanAway);
                    return Ok(self.finish(BattleOutcome::Fled, events));
                }
                events.push(BattleEvent::EscapeFailed);
            }
        }

        self.opponent_turn(rng, events)?;

        let active_fainted = self
            .trainer
            .party()
            .get(self.active_index)
            .map(|p| p.is_fainted())
            .unwrap_or(true);
        if active_fainted {
            events.push(BattleEvent::Fainted {
                name: self.trainer.party()[self.active_index].nickname.clone(),
            });
            if self.trainer.has_other_usable(self.active_index) {
                self.turn_number += 1;
                self.phase = BattlePhase::AwaitingReplacement;
                return Ok(TurnOutcome::Consumed);
            }
            return Ok(self.finish(BattleOutcome::Defeat, events));
        }

        self.turn_number += 1;
        if self.turn_number >= MAX_TURNS {
            return Ok(self.finish(BattleOutcome::Draw, events));
        }
        Ok(TurnOutcome::Consumed)
    }

    /// Resolve the forced replacement after the active creature fainted.
    /// Passing `None` (no creature chosen) concedes the battle.
    pub fn resolve_replacement(
        &mut self,
        choice: Option<usize>,
        events: &mut EventBus,
    ) -> TurnOutcome {
        match self.phase {
            BattlePhase::Ended(outcome) => return TurnOutcome::Ended(outcome),
            BattlePhase::AwaitingAction => return TurnOutcome::Retry,
            BattlePhase::AwaitingReplacement => {}
        }

        let Some(team_index) = choice else {
            return self.finish(BattleOutcome::Defeat, events);
        };
        if !self.switch_target_is_valid(team_index) {
            events.push(BattleEvent::ActionFailed {
                reason: ActionFailureReason::InvalidSwitchTarget,
            });
            return TurnOutcome::Retry;
        }

        let replaced = self.trainer.party()[self.active_index].nickname.clone();
        self.active_index = team_index;
        self.phase = BattlePhase::AwaitingAction;
        events.push(BattleEvent::SwitchedIn {
            name: self.trainer.party()[team_index].nickname.clone(),
            replaced,
        });
        TurnOutcome::Consumed
    }

    fn switch_target_is_valid(&self, team_index: usize) -> bool {
        team_index != self.active_index
            && self
                .trainer
                .party()
                .get(team_index)
                .is_some_and(|p| !p.is_fainted())
    }

    fn opponent_turn(&mut self, rng: &mut TurnRng, events: &mut EventBus) -> BattleResult<()> {
        if self.opponent.moves.is_empty() {
            return Ok(());
        }
        let index = rng.choose(self.opponent.moves.len(), "opponent move choice");
        let template = self.opponent.moves[index].template.clone();

        events.push(BattleEvent::MoveUsed {
            attacker: self.opponent.nickname.clone(),
            move_name: template.name.clone(),
        });

        // The opponent's attack rolls no accuracy and spends no PP.
        let roll = {
            let defender = self
                .trainer
                .party()
                .get(self.active_index)
                .ok_or(BattleError::InvalidPartySlot(self.active_index))?;
            self.opponent.damage_against(&template, defender, rng)
        };

        let defender = self
            .trainer
            .party_mut()
            .get_mut(self.active_index)
            .ok_or(BattleError::InvalidPartySlot(self.active_index))?;
        defender.take_damage(roll.amount);
        events.push(BattleEvent::DamageDealt {
            target: defender.nickname.clone(),
            amount: roll.amount,
            remaining_hp: defender.current_hp(),
        });
        if !template.is_status_move() && roll.effectiveness != 1.0 {
            events.push(BattleEvent::Effectiveness {
                multiplier: roll.effectiveness,
            });
        }
        Ok(())
    }

    fn award_experience(&mut self, events: &mut EventBus) -> BattleResult<()> {
        let opponent_level = self.opponent.level;
        let active = self
            .trainer
            .party_mut()
            .get_mut(self.active_index)
            .ok_or(BattleError::InvalidPartySlot(self.active_index))?;

        let amount = experience_reward(active.level, opponent_level);
        events.push(BattleEvent::ExperienceGained {
            name: active.nickname.clone(),
            amount,
        });
        if active.gain_experience(amount) {
            events.push(BattleEvent::LeveledUp {
                name: active.nickname.clone(),
                level: active.level,
            });
        }
        Ok(())
    }

    fn finish(&mut self, outcome: BattleOutcome, events: &mut EventBus) -> TurnOutcome {
        self.phase = BattlePhase::Ended(outcome);
        events.push(BattleEvent::BattleEnded { outcome });
        TurnOutcome::Ended(outcome)
    }
}

/// Experience for defeating an opponent:
/// floor(opponent.level * 10 * max(1, opponent.level - player.level + 5) / 10)
pub fn experience_reward(player_level: u8, opponent_level: u8) -> u32 {
    let base_exp = opponent_level as u32 * 10;
    let level_diff = (opponent_level as i32 - player_level as i32 + 5).max(1) as u32;
    base_exp * level_diff / 10
}
