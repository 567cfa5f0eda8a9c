//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::types::{BackendResult, Message, Role, SuggestedSlot, TurnOutcome};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_state() -> impl Strategy<Value = SessionState> {
    prop_oneof![Just(SessionState::Idle), Just(SessionState::Awaiting)]
}

fn arb_visible_text() -> impl Strategy<Value = String> {
    "[ \t]{0,3}[a-zA-Z0-9?!.,']{1,40}[ \n]{0,3}"
}

fn arb_blank_text() -> impl Strategy<Value = String> {
    "[ \t\n]{0,6}"
}

fn arb_assistant_message() -> impl Strategy<Value = Message> {
    "[a-zA-Z0-9 .!?]{1,60}".prop_map(Message::assistant)
}

fn arb_slots() -> impl Strategy<Value = Option<Vec<SuggestedSlot>>> {
    proptest::option::of(proptest::collection::vec(
        "2024-0[1-9]-1[0-9]T1[0-9]:00:00Z".prop_map(SuggestedSlot::new),
        0..4,
    ))
}

fn arb_backend_result() -> impl Strategy<Value = BackendResult> {
    prop_oneof![
        (
            proptest::collection::vec(arb_assistant_message(), 0..2),
            arb_slots(),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(|(messages, slots, lead_captured, meeting_scheduled)| {
                BackendResult::Success {
                    new_assistant_messages: messages,
                    suggested_slots: slots,
                    outcome: TurnOutcome {
                        lead_captured,
                        meeting_scheduled,
                    },
                }
            }),
        "[a-z ]{1,30}".prop_map(BackendResult::failure),
    ]
}

#[derive(Debug, Clone)]
enum Step {
    Turn(String),
    Reply(BackendResult),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => arb_visible_text().prop_map(Step::Turn),
        1 => arb_blank_text().prop_map(Step::Turn),
        3 => arb_backend_result().prop_map(Step::Reply),
    ]
}

fn appended(effects: &[Effect]) -> Vec<&Message> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::AppendMessage(m) => Some(m),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Invariants
// ============================================================================

proptest! {
    // Invariant 1: A turn while a request is in flight never changes anything
    #[test]
    fn prop_turn_while_awaiting_is_rejected(text in arb_visible_text()) {
        let result = transition(SessionState::Awaiting, Event::user_turn(text));
        prop_assert_eq!(result.unwrap_err(), TransitionError::RequestPending);
    }

    // Invariant 2: An accepted turn appends exactly one trimmed user message
    // and issues exactly one request
    #[test]
    fn prop_accepted_turn_appends_one_user_message(text in arb_visible_text()) {
        let tr = transition(SessionState::Idle, Event::user_turn(text.clone())).unwrap();
        prop_assert_eq!(tr.new_state, SessionState::Awaiting);

        let messages = appended(&tr.effects);
        prop_assert_eq!(messages.len(), 1);
        prop_assert_eq!(messages[0].role, Role::User);
        prop_assert_eq!(messages[0].content.as_str(), text.trim());

        let requests = tr
            .effects
            .iter()
            .filter(|e| matches!(e, Effect::RequestBackend { .. }))
            .count();
        prop_assert_eq!(requests, 1);
    }

    // Invariant 3: Blank turns are rejected in every state
    #[test]
    fn prop_blank_turn_never_accepted(state in arb_state(), text in arb_blank_text()) {
        prop_assert!(transition(state, Event::user_turn(text)).is_err());
    }

    // Invariant 4: Any settlement returns to Idle and clears the pending flag last
    #[test]
    fn prop_settlement_always_returns_to_idle(result in arb_backend_result()) {
        let tr = transition(SessionState::Awaiting, Event::BackendSettled { result }).unwrap();
        prop_assert_eq!(tr.new_state, SessionState::Idle);
        prop_assert_eq!(tr.effects.last(), Some(&Effect::NotifyPending(false)));
    }

    // Invariant 5: A failure appends exactly one fallback message
    #[test]
    fn prop_failure_appends_exactly_one_fallback(reason in "[a-z ]{0,30}") {
        let tr = transition(
            SessionState::Awaiting,
            Event::BackendSettled { result: BackendResult::failure(reason) },
        )
        .unwrap();
        let fallback = Message::fallback();
        prop_assert_eq!(appended(&tr.effects), vec![&fallback]);
    }

    // Invariant 6: Over any event sequence, the pending flag mirrors the state,
    // requests never overlap, and each accepted turn grows history by at least one
    #[test]
    fn prop_sequences_preserve_protocol(steps in proptest::collection::vec(arb_step(), 1..40)) {
        let mut state = SessionState::Idle;
        let mut pending = false;
        let mut in_flight = 0usize;
        let mut history_len = 0usize;

        for step in steps {
            let event = match step {
                Step::Turn(text) => Event::user_turn(text),
                Step::Reply(result) => Event::BackendSettled { result },
            };
            let accepted_turn = matches!(event, Event::UserTurn { .. });
            let before = history_len;

            let Ok(tr) = transition(state, event) else {
                continue;
            };

            for effect in &tr.effects {
                match effect {
                    Effect::AppendMessage(_) => history_len += 1,
                    Effect::NotifyPending(flag) => {
                        prop_assert_ne!(*flag, pending, "pending flag must toggle");
                        pending = *flag;
                    }
                    Effect::RequestBackend { .. } => {
                        in_flight += 1;
                        prop_assert_eq!(in_flight, 1, "at most one request in flight");
                    }
                    Effect::OfferSlots(slots) => prop_assert!(!slots.is_empty()),
                    Effect::ReportOutcome(_) => {}
                }
            }
            if tr.new_state == SessionState::Idle {
                in_flight = 0;
            }
            if accepted_turn {
                prop_assert!(history_len > before);
            }

            state = tr.new_state;
            prop_assert_eq!(state.is_pending(), pending);
        }
    }
}
