use spacetimedb::rand::Rng;
use spacetimedb::{table, SpacetimeType, Timestamp};

use crate::arithmetic::Operation;
use crate::config::{Rules, HAND_SIZE};
use crate::error::Rejection;
use crate::rational::Rational;
use crate::solver;
use crate::timer::shift;
use crate::turn::TurnState;

/// Primary key of the single session row
pub const SESSION_ID: u32 = 0;

/// A surviving operand on the board
#[derive(SpacetimeType, Clone, Debug, PartialEq)]
pub struct Card {
    pub id: u32,
    pub numerator: i64,
    pub denominator: i64,
    pub selected: bool,
    pub selected_by: Option<String>,
}

impl Card {
    pub fn value(&self) -> Rational {
        Rational { numerator: self.numerator, denominator: self.denominator }
    }

    fn set_value(&mut self, value: Rational) {
        self.numerator = value.numerator;
        self.denominator = value.denominator;
    }

    fn select(&mut self, participant: &str) {
        self.selected = true;
        self.selected_by = Some(participant.to_string());
    }

    fn deselect(&mut self) {
        self.selected = false;
        self.selected_by = None;
    }

    fn is_owned_by(&self, participant: &str) -> bool {
        self.selected_by.as_deref() == Some(participant)
    }
}

/// Original value of a dealt card, used to rebuild the board after a failed attempt
#[derive(SpacetimeType, Clone, Debug, PartialEq)]
pub struct CardHistoryEntry {
    pub id: u32,
    pub numerator: i64,
    pub denominator: i64,
    pub is_removed: bool,
}

/// The shared game document. Exactly one row exists while anyone is connected.
#[table(name = session_state, public)]
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    #[primary_key]
    pub id: u32,

    /// Increments on every deal
    pub round: u32,

    pub cards: Vec<Card>,

    /// Fixed for the whole round
    pub card_history: Vec<CardHistoryEntry>,

    pub selected_card_id: Option<u32>,
    pub current_operation: Option<Operation>,

    /// False once the round is won or lost
    pub active: bool,
    pub won: bool,
    pub last_winner_id: Option<String>,

    pub turn: TurnState,

    /// Round countdown; None while paused by a thinking lock or after the round ended
    pub reset_deadline: Option<Timestamp>,

    /// When the next round is dealt automatically (only after a round ended)
    pub next_round_at: Option<Timestamp>,

    /// Bumped whenever a deadline is armed
    pub timer_epoch: u64,
    /// Highest epoch whose deadline has already been resolved
    pub resolved_epoch: u64,

    /// Solver answer shown after a lost round
    pub reveal: Option<String>,
}

/// Result of a card click
#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    Selected,
    Switched,
    Deselected,
    Applied(ApplyOutcome),
    /// Dangling selection or orphaned operation was cleared; the click itself is dropped
    Healed,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    Continuing,
    Won { winner: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ThinkingResolution {
    Solved { winner: String },
    Restored,
}

/// Draw a fresh hand uniformly from the configured card range
pub fn deal_hand<R: Rng>(rng: &mut R, rules: &Rules) -> [i64; HAND_SIZE] {
    std::array::from_fn(|_| rng.gen_range(rules.card_min..=rules.card_max))
}

impl SessionState {
    /// New active round for `hand`
    pub fn deal(round: u32, hand: [i64; HAND_SIZE], now: Timestamp, rules: &Rules) -> Self {
        let cards = hand
            .iter()
            .zip(0u32..)
            .map(|(&value, id)| Card {
                id,
                numerator: value,
                denominator: 1,
                selected: false,
                selected_by: None,
            })
            .collect();
        let card_history = hand
            .iter()
            .zip(0u32..)
            .map(|(&value, id)| CardHistoryEntry {
                id,
                numerator: value,
                denominator: 1,
                is_removed: false,
            })
            .collect();

        Self {
            id: SESSION_ID,
            round,
            cards,
            card_history,
            selected_card_id: None,
            current_operation: None,
            active: true,
            won: false,
            last_winner_id: None,
            turn: TurnState::Idle,
            reset_deadline: Some(shift(now, rules.reset_window_micros())),
            next_round_at: None,
            timer_epoch: 1,
            resolved_epoch: 0,
            reveal: None,
        }
    }

    /// Replace a finished round with a fresh deal
    pub fn start_new_round(
        &mut self,
        hand: [i64; HAND_SIZE],
        now: Timestamp,
        rules: &Rules,
    ) -> Result<(), Rejection> {
        if self.active {
            return Err(Rejection::RoundInProgress);
        }
        self.redeal(hand, now, rules);
        Ok(())
    }

    /// Deal `hand` over whatever is on the board, keeping the round counter,
    /// last winner and timer latch moving forward
    pub fn redeal(&mut self, hand: [i64; HAND_SIZE], now: Timestamp, rules: &Rules) {
        let epoch = self.timer_epoch;
        let last_winner = self.last_winner_id.take();
        *self = Self::deal(self.round + 1, hand, now, rules);
        self.last_winner_id = last_winner;
        // Anything armed before the deal counts as resolved
        self.resolved_epoch = epoch;
        self.timer_epoch = epoch + 1;
    }

    pub fn card(&self, id: u32) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    fn card_mut(&mut self, id: u32) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    /// Selection points at an existing card, and an operation is only set alongside a selection
    pub fn selection_is_consistent(&self) -> bool {
        match self.selected_card_id {
            Some(id) => self.card(id).is_some(),
            None => self.current_operation.is_none(),
        }
    }

    /// Starting integer values of this round
    pub fn original_hand(&self) -> Vec<i64> {
        self.card_history.iter().map(|entry| entry.numerator).collect()
    }

    /// Exactly one card left and it equals the target
    pub fn is_solved(&self, target: i64) -> bool {
        match self.cards.as_slice() {
            [card] => card.value().equals_integer(target),
            _ => false,
        }
    }

    /// Card click by the turn holder
    pub fn select_card(
        &mut self,
        participant: &str,
        card_id: u32,
        now: Timestamp,
        rules: &Rules,
    ) -> Result<SelectOutcome, Rejection> {
        self.ensure_holder(participant)?;

        let card = self.card(card_id).ok_or(Rejection::UnknownCard(card_id))?;
        if card.selected_by.as_deref().is_some_and(|owner| owner != participant) {
            return Err(Rejection::ForeignCard(card_id));
        }
        let owned = card.is_owned_by(participant);

        if !self.selection_is_consistent() {
            log::warn!(
                "[SELECT] clearing inconsistent selection round:{} selected:{:?} op:{:?}",
                self.round,
                self.selected_card_id,
                self.current_operation
            );
            self.selected_card_id = None;
            self.current_operation = None;
            return Ok(SelectOutcome::Healed);
        }

        match (self.selected_card_id, self.current_operation) {
            (None, _) => {
                if let Some(card) = self.card_mut(card_id) {
                    card.select(participant);
                }
                self.selected_card_id = Some(card_id);
                Ok(SelectOutcome::Selected)
            }
            (Some(selected), Some(op)) if selected != card_id => self
                .apply_operation(participant, selected, card_id, op, now, rules)
                .map(SelectOutcome::Applied),
            (Some(selected), None) if selected != card_id => {
                if let Some(previous) = self.card_mut(selected) {
                    previous.deselect();
                }
                if let Some(card) = self.card_mut(card_id) {
                    card.select(participant);
                }
                self.selected_card_id = Some(card_id);
                Ok(SelectOutcome::Switched)
            }
            (Some(_), _) if owned => {
                if let Some(card) = self.card_mut(card_id) {
                    card.deselect();
                }
                self.selected_card_id = None;
                self.current_operation = None;
                Ok(SelectOutcome::Deselected)
            }
            _ => Ok(SelectOutcome::Unchanged),
        }
    }

    /// Pick the operation to apply with the next card click
    pub fn choose_operation(&mut self, participant: &str, op: Operation) -> Result<(), Rejection> {
        self.ensure_holder(participant)?;
        let selected = self.selected_card_id.ok_or(Rejection::NoSelection)?;
        let card = self.card(selected).ok_or(Rejection::UnknownCard(selected))?;
        if !card.is_owned_by(participant) {
            return Err(Rejection::ForeignCard(selected));
        }
        self.current_operation = Some(op);
        Ok(())
    }

    /// Combine `left op right` into the `right` card and drop `left`.
    /// Nothing changes when the arithmetic fails.
    pub fn apply_operation(
        &mut self,
        participant: &str,
        left_id: u32,
        right_id: u32,
        op: Operation,
        now: Timestamp,
        rules: &Rules,
    ) -> Result<ApplyOutcome, Rejection> {
        self.ensure_holder(participant)?;
        let left = self.card(left_id).ok_or(Rejection::UnknownCard(left_id))?.value();
        let right = self.card(right_id).ok_or(Rejection::UnknownCard(right_id))?.value();
        let result = op.apply(left, right)?;

        self.cards.retain(|c| c.id != left_id);
        if let Some(card) = self.card_mut(right_id) {
            card.set_value(result);
            card.select(participant);
        }
        if let Some(entry) = self.card_history.iter_mut().find(|e| e.id == left_id) {
            entry.is_removed = true;
        }
        self.selected_card_id = Some(right_id);
        self.current_operation = None;

        if self.is_solved(rules.target) {
            self.finish_win(participant, now, rules);
            return Ok(ApplyOutcome::Won { winner: participant.to_string() });
        }
        Ok(ApplyOutcome::Continuing)
    }

    /// Put every dealt card back with its original value
    pub fn restore_from_history(&mut self) {
        for entry in &mut self.card_history {
            entry.is_removed = false;
        }
        self.cards = self
            .card_history
            .iter()
            .map(|entry| Card {
                id: entry.id,
                numerator: entry.numerator,
                denominator: entry.denominator,
                selected: false,
                selected_by: None,
            })
            .collect();
        self.selected_card_id = None;
        self.current_operation = None;
    }

    /// The thinking lock ran out: keep a finished board, otherwise rebuild it
    /// and resume the round countdown with the time that was left.
    pub fn resolve_thinking_timeout(
        &mut self,
        now: Timestamp,
        rules: &Rules,
    ) -> Option<ThinkingResolution> {
        let TurnState::Thinking(lock) = &self.turn else {
            return None;
        };
        if !self.active || now < lock.deadline {
            return None;
        }
        let holder = lock.holder.clone();

        if self.is_solved(rules.target) {
            self.finish_win(&holder, now, rules);
            return Some(ThinkingResolution::Solved { winner: holder });
        }
        self.restore_from_history();
        self.release_turn(now);
        Some(ThinkingResolution::Restored)
    }

    /// The idle round countdown ran out: the round is lost as it stands
    pub fn resolve_reset_timeout(&mut self, now: Timestamp, rules: &Rules) -> bool {
        if !self.active || !self.turn.is_idle() {
            return false;
        }
        match self.reset_deadline {
            Some(deadline) if now >= deadline => {
                self.finish_loss(now, rules);
                true
            }
            _ => false,
        }
    }

    fn finish_win(&mut self, winner: &str, now: Timestamp, rules: &Rules) {
        self.active = false;
        self.won = true;
        self.last_winner_id = Some(winner.to_string());
        self.current_operation = None;
        self.reveal = None;
        self.end_round(now, rules);
    }

    fn finish_loss(&mut self, now: Timestamp, rules: &Rules) {
        self.active = false;
        self.won = false;
        self.reveal = Some(solver::describe(&self.original_hand(), rules.target));
        self.end_round(now, rules);
    }

    fn end_round(&mut self, now: Timestamp, rules: &Rules) {
        self.turn = TurnState::Idle;
        self.reset_deadline = None;
        self.next_round_at = Some(shift(now, rules.intermission_micros()));
        self.rearm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArithmeticError;
    use crate::timer::tests::at;
    use spacetimedb::rand::rngs::mock::StepRng;

    fn rules() -> Rules {
        Rules::default()
    }

    /// Session for `hand` with `holder` already thinking
    fn thinking(hand: [i64; HAND_SIZE], holder: &str) -> SessionState {
        let mut state = SessionState::deal(1, hand, at(0), &rules());
        state.request_turn(holder, at(1), &rules()).unwrap();
        state
    }

    fn values(state: &SessionState) -> Vec<(u32, Rational)> {
        state.cards.iter().map(|c| (c.id, c.value())).collect()
    }

    #[test]
    fn test_deal_builds_cards_and_history() {
        let state = SessionState::deal(3, [1, 5, 7, 10], at(0), &rules());
        assert_eq!(state.round, 3);
        assert_eq!(state.cards.len(), 4);
        assert_eq!(state.card_history.len(), 4);
        assert_eq!(state.original_hand(), vec![1, 5, 7, 10]);
        assert!(state.active);
        assert!(state.turn.is_idle());
        assert_eq!(state.reset_deadline, Some(at(30)));
        assert!(state.selection_is_consistent());
    }

    #[test]
    fn test_deal_hand_stays_in_range() {
        let mut rng = StepRng::new(u64::MAX / 3, 0x9E37_79B9_7F4A_7C15);
        for _ in 0..50 {
            let hand = deal_hand(&mut rng, &rules());
            assert!(hand.iter().all(|v| (1..=10).contains(v)), "{:?}", hand);
        }
    }

    #[test]
    fn test_select_then_switch_then_deselect() {
        let mut state = thinking([1, 2, 3, 4], "alice");

        assert_eq!(state.select_card("alice", 0, at(2), &rules()), Ok(SelectOutcome::Selected));
        assert_eq!(state.selected_card_id, Some(0));
        assert!(state.card(0).unwrap().is_owned_by("alice"));

        assert_eq!(state.select_card("alice", 2, at(2), &rules()), Ok(SelectOutcome::Switched));
        assert_eq!(state.selected_card_id, Some(2));
        assert!(!state.card(0).unwrap().selected);
        assert_eq!(state.card(0).unwrap().selected_by, None);
        assert!(state.card(2).unwrap().selected);

        state.choose_operation("alice", Operation::Add).unwrap();
        assert_eq!(state.select_card("alice", 2, at(3), &rules()), Ok(SelectOutcome::Deselected));
        assert_eq!(state.selected_card_id, None);
        assert_eq!(state.current_operation, None);
        assert!(!state.card(2).unwrap().selected);
    }

    #[test]
    fn test_non_holder_cannot_select() {
        let mut state = thinking([1, 2, 3, 4], "alice");
        let before = state.clone();
        assert_eq!(state.select_card("bob", 1, at(2), &rules()), Err(Rejection::NotTurnHolder));
        assert_eq!(state, before);

        // Even a card bob somehow owns stays out of reach
        state.cards[1].select("bob");
        let before = state.clone();
        assert_eq!(state.select_card("bob", 1, at(2), &rules()), Err(Rejection::NotTurnHolder));
        assert_eq!(state, before);
    }

    #[test]
    fn test_idle_turn_rejects_selection() {
        let mut state = SessionState::deal(1, [1, 2, 3, 4], at(0), &rules());
        assert_eq!(state.select_card("alice", 0, at(1), &rules()), Err(Rejection::NotTurnHolder));
    }

    #[test]
    fn test_unknown_and_foreign_cards_rejected() {
        let mut state = thinking([1, 2, 3, 4], "alice");
        assert_eq!(state.select_card("alice", 9, at(2), &rules()), Err(Rejection::UnknownCard(9)));

        state.cards[3].select("bob");
        let before = state.clone();
        assert_eq!(state.select_card("alice", 3, at(2), &rules()), Err(Rejection::ForeignCard(3)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_choose_operation_requires_owned_selection() {
        let mut state = thinking([1, 2, 3, 4], "alice");
        assert_eq!(state.choose_operation("alice", Operation::Add), Err(Rejection::NoSelection));
        assert_eq!(state.choose_operation("bob", Operation::Add), Err(Rejection::NotTurnHolder));

        state.select_card("alice", 1, at(2), &rules()).unwrap();
        state.choose_operation("alice", Operation::Multiply).unwrap();
        assert_eq!(state.current_operation, Some(Operation::Multiply));
    }

    #[test]
    fn test_apply_merges_into_second_card() {
        let mut state = thinking([3, 3, 8, 8], "alice");
        state.select_card("alice", 2, at(2), &rules()).unwrap();
        state.choose_operation("alice", Operation::Divide).unwrap();
        let outcome = state.select_card("alice", 0, at(3), &rules());

        assert_eq!(outcome, Ok(SelectOutcome::Applied(ApplyOutcome::Continuing)));
        assert_eq!(state.cards.len(), 3);
        assert!(state.card(2).is_none());
        let merged = state.card(0).unwrap();
        assert_eq!(merged.value(), Rational::new(8, 3).unwrap());
        assert!(merged.is_owned_by("alice"));
        assert_eq!(state.selected_card_id, Some(0));
        assert_eq!(state.current_operation, None);
        assert!(state.card_history.iter().find(|e| e.id == 2).unwrap().is_removed);
        assert!(!state.card_history.iter().find(|e| e.id == 0).unwrap().is_removed);
    }

    #[test]
    fn test_full_solution_wins_round() {
        let mut state = thinking([3, 3, 8, 8], "alice");
        let r = rules();
        // 8 / 3
        state.select_card("alice", 2, at(2), &r).unwrap();
        state.choose_operation("alice", Operation::Divide).unwrap();
        state.select_card("alice", 0, at(2), &r).unwrap();
        assert_eq!(state.cards.len(), 3);
        // 3 - 8/3
        assert_eq!(state.select_card("alice", 0, at(3), &r), Ok(SelectOutcome::Deselected));
        state.select_card("alice", 1, at(3), &r).unwrap();
        state.choose_operation("alice", Operation::Subtract).unwrap();
        state.select_card("alice", 0, at(3), &r).unwrap();
        // 3 - 8/3 = 1/3 stays selected in card 0; click it again to let go
        assert_eq!(state.select_card("alice", 0, at(3), &r), Ok(SelectOutcome::Deselected));
        assert_eq!(state.card(0).unwrap().value(), Rational::new(1, 3).unwrap());
        assert_eq!(state.cards.len(), 2);
        // 8 / (1/3)
        state.select_card("alice", 3, at(4), &r).unwrap();
        state.choose_operation("alice", Operation::Divide).unwrap();
        let outcome = state.select_card("alice", 0, at(4), &r);

        assert_eq!(
            outcome,
            Ok(SelectOutcome::Applied(ApplyOutcome::Won { winner: "alice".to_string() }))
        );
        assert_eq!(state.cards.len(), 1);
        assert!(state.cards[0].value().equals_integer(24));
        assert!(!state.active);
        assert!(state.won);
        assert_eq!(state.last_winner_id.as_deref(), Some("alice"));
        assert!(state.turn.is_idle());
        assert_eq!(state.next_round_at, Some(at(9)));
    }

    #[test]
    fn test_divide_by_zero_leaves_state_untouched() {
        let mut state = thinking([5, 5, 4, 6], "alice");
        let r = rules();
        // 5 - 5 = 0 lands in card 1
        state.select_card("alice", 0, at(2), &r).unwrap();
        state.choose_operation("alice", Operation::Subtract).unwrap();
        state.select_card("alice", 1, at(2), &r).unwrap();
        assert!(state.card(1).unwrap().value().is_zero());

        // 4 / 0
        state.select_card("alice", 1, at(3), &r).unwrap();
        state.select_card("alice", 2, at(3), &r).unwrap();
        state.choose_operation("alice", Operation::Divide).unwrap();
        let before = state.clone();
        assert_eq!(
            state.select_card("alice", 1, at(3), &r),
            Err(Rejection::Arithmetic(ArithmeticError::DivideByZero))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_card_count_drops_by_one_per_apply() {
        let mut state = thinking([1, 2, 3, 4], "alice");
        let r = rules();
        for expected in [3usize, 2, 1] {
            let ids: Vec<u32> = state.cards.iter().map(|c| c.id).collect();
            state.selected_card_id = None;
            for card in &mut state.cards {
                card.deselect();
            }
            state.select_card("alice", ids[0], at(2), &r).unwrap();
            state.choose_operation("alice", Operation::Add).unwrap();
            state.select_card("alice", ids[1], at(2), &r).unwrap();
            assert_eq!(state.cards.len(), expected);
        }
        // 1 + 2 + 3 + 4 = 10, not a win
        assert_eq!(values(&state), vec![(3, Rational::integer(10))]);
        assert!(state.active);
    }

    #[test]
    fn test_inconsistent_selection_heals_once() {
        let mut state = thinking([1, 2, 3, 4], "alice");
        state.selected_card_id = Some(42);
        state.current_operation = Some(Operation::Add);

        assert_eq!(state.select_card("alice", 0, at(2), &rules()), Ok(SelectOutcome::Healed));
        assert_eq!(state.selected_card_id, None);
        assert_eq!(state.current_operation, None);
        assert!(state.selection_is_consistent());

        // The next click is handled normally instead of healing again
        assert_eq!(state.select_card("alice", 0, at(2), &rules()), Ok(SelectOutcome::Selected));
    }

    #[test]
    fn test_orphaned_operation_is_healed() {
        let mut state = thinking([1, 2, 3, 4], "alice");
        state.current_operation = Some(Operation::Divide);
        assert_eq!(state.select_card("alice", 1, at(2), &rules()), Ok(SelectOutcome::Healed));
        assert_eq!(state.current_operation, None);
    }

    #[test]
    fn test_failed_attempt_restores_board_and_countdown() {
        let r = rules();
        let mut state = SessionState::deal(1, [3, 3, 8, 8], at(0), &r);
        // 12 seconds left on the round when the lock is taken
        state.request_turn("alice", at(18), &r).unwrap();
        state.select_card("alice", 0, at(19), &r).unwrap();
        state.choose_operation("alice", Operation::Add).unwrap();
        state.select_card("alice", 1, at(19), &r).unwrap();
        assert_eq!(state.cards.len(), 3);

        assert_eq!(state.resolve_thinking_timeout(at(27), &r), None);
        assert_eq!(state.resolve_thinking_timeout(at(28), &r), Some(ThinkingResolution::Restored));

        assert!(state.turn.is_idle());
        assert_eq!(state.reset_deadline, Some(at(40)));
        assert_eq!(
            values(&state),
            vec![
                (0, Rational::integer(3)),
                (1, Rational::integer(3)),
                (2, Rational::integer(8)),
                (3, Rational::integer(8)),
            ]
        );
        assert!(state.cards.iter().all(|c| !c.selected && c.selected_by.is_none()));
        assert!(state.card_history.iter().all(|e| !e.is_removed));
        assert_eq!(state.selected_card_id, None);
        assert!(state.active);
    }

    #[test]
    fn test_thinking_timeout_on_solved_board_is_a_win() {
        let r = rules();
        let mut state = thinking([3, 3, 8, 8], "alice");
        state.cards.truncate(1);
        state.cards[0].set_value(Rational::integer(24));

        assert_eq!(
            state.resolve_thinking_timeout(at(11), &r),
            Some(ThinkingResolution::Solved { winner: "alice".to_string() })
        );
        assert!(state.won);
        assert!(!state.active);
    }

    #[test]
    fn test_reset_timeout_only_while_idle() {
        let r = rules();
        let mut state = SessionState::deal(1, [1, 1, 1, 1], at(0), &r);
        assert!(!state.resolve_reset_timeout(at(29), &r));
        assert!(state.resolve_reset_timeout(at(30), &r));
        assert!(!state.active);
        assert!(!state.won);
        assert_eq!(state.cards.len(), 4);
        assert_eq!(state.reveal.as_deref(), Some("No solution"));
        // Already over
        assert!(!state.resolve_reset_timeout(at(31), &r));

        let mut busy = thinking([1, 2, 3, 4], "alice");
        assert!(!busy.resolve_reset_timeout(at(60), &r));
    }

    #[test]
    fn test_start_new_round() {
        let r = rules();
        let mut state = SessionState::deal(1, [1, 1, 1, 1], at(0), &r);
        assert_eq!(state.start_new_round([2, 2, 2, 2], at(1), &r), Err(Rejection::RoundInProgress));

        state.last_winner_id = Some("alice".to_string());
        state.resolve_reset_timeout(at(30), &r);
        let epoch = state.timer_epoch;
        state.start_new_round([2, 3, 4, 5], at(31), &r).unwrap();

        assert_eq!(state.round, 2);
        assert!(state.active);
        assert_eq!(state.original_hand(), vec![2, 3, 4, 5]);
        assert_eq!(state.reveal, None);
        assert_eq!(state.next_round_at, None);
        assert_eq!(state.reset_deadline, Some(at(61)));
        assert_eq!(state.last_winner_id.as_deref(), Some("alice"));
        assert_eq!(state.resolved_epoch, epoch);
        assert_eq!(state.timer_epoch, epoch + 1);
    }
}
