use dreamstory_game::{
    AckOutcome, ActionId, Attribute, ConfirmOutcome, GameSession, Mood, OutingOutcome,
    RequestOutcome, RoomId, ScriptedDice, StreakIndicator, Valence,
};

fn quiet_session() -> GameSession<ScriptedDice> {
    GameSession::with_dice(ScriptedDice::never_outing())
}

fn perform(session: &mut GameSession<ScriptedDice>, action: ActionId) -> i32 {
    match session.request(action) {
        RequestOutcome::AwaitingConfirmation(_) => {}
        other => panic!("{action} did not prompt: {other:?}"),
    }
    match session.confirm_pending(true) {
        ConfirmOutcome::Resolved(feedback) => feedback.points,
        other => panic!("{action} did not resolve: {other:?}"),
    }
}

#[test]
fn sleeping_from_a_fresh_session() {
    let mut session = quiet_session();
    let points = perform(&mut session, ActionId::Sleep);

    assert_eq!(points, 25);
    assert_eq!(session.stats().get(Attribute::SleepQuality), 80);
    assert_eq!(session.stats().get(Attribute::Energy), 75);
    assert_eq!(session.stats().get(Attribute::Health), 65);
    assert_eq!(session.score(), 25);
    // mean(65, 75, 80, 50, 50, 50) = 61.67 sits in the relaxed band.
    assert!((session.stats().mood_average() - 61.666).abs() < 0.01);
    assert_eq!(session.mood(), Mood::Relaxed);
    assert!(session.ledger().is_used(ActionId::Sleep));
    assert_eq!(session.ledger().used_count(), 1);
}

#[test]
fn repeating_an_action_changes_nothing() {
    let mut session = quiet_session();
    perform(&mut session, ActionId::ReadBook);
    let before = session.state().clone();

    let RequestOutcome::Rejected(notice) = session.request(ActionId::ReadBook) else {
        panic!("second read should be rejected");
    };
    assert_eq!(notice.points, 0);
    assert_eq!(notice.tone, Valence::Negative);
    assert_eq!(session.state(), &before);
    assert!(session.pending_confirmation().is_none());
}

#[test]
fn rollover_clears_the_ledger_only() {
    let mut session = quiet_session();
    for action in [ActionId::Sleep, ActionId::Shower, ActionId::CookHealthy] {
        perform(&mut session, action);
    }
    let stats = session.stats().clone();
    let score = session.score();
    let streak = *session.streak();

    let mut rollovers = 0;
    while session.clock().day() == 1 {
        if session.tick().rolled_over {
            rollovers += 1;
        }
    }
    assert_eq!(rollovers, 1);
    assert_eq!(session.clock().time_label(), "00:00");
    assert!(session.ledger().entries().all(|(_, used)| !used));
    assert_eq!(session.stats(), &stats);
    assert_eq!(session.score(), score);
    assert_eq!(session.streak(), &streak);

    // Yesterday's actions are available again.
    assert_eq!(perform(&mut session, ActionId::Sleep), 37);
}

#[test]
fn streak_bonus_after_three_positive_actions() {
    let mut session = quiet_session();
    assert_eq!(perform(&mut session, ActionId::Sleep), 25);
    assert_eq!(perform(&mut session, ActionId::BrushTeeth), 15);
    assert_eq!(perform(&mut session, ActionId::Shower), 20);
    assert_eq!(session.streak_indicator(), Some(StreakIndicator::Hot(3)));

    let RequestOutcome::AwaitingConfirmation(_) = session.request(ActionId::Meditation) else {
        panic!("meditation should prompt");
    };
    let ConfirmOutcome::Resolved(feedback) = session.confirm_pending(true) else {
        panic!("meditation should resolve");
    };
    assert_eq!(feedback.points, 30);
    assert!(feedback.message.contains("Bonus applied"));
    assert_eq!(session.score(), 25 + 15 + 20 + 30);

    assert_eq!(perform(&mut session, ActionId::WatchTv), -12);
    assert_eq!(session.streak().consecutive_good_actions, 0);
    assert_eq!(session.streak().consecutive_bad_actions, 1);
    assert_eq!(session.streak_indicator(), None);

    // Back to base points once the streak is broken.
    assert_eq!(perform(&mut session, ActionId::DrinkWater), 12);
}

#[test]
fn bad_outing_costs_points_and_credits_relaxation() {
    let mut session = GameSession::with_dice(ScriptedDice::new([0.1], [0.9]));
    perform(&mut session, ActionId::DrinkWater);
    assert_eq!(session.score(), 12);

    let RequestOutcome::EventRevealed(event) = session.request(ActionId::Relax) else {
        panic!("gate draw of 0.1 must divert into an outing");
    };
    assert_eq!(event.outcome, OutingOutcome::Bad);
    assert_eq!(event.points, -15);
    assert!(!session.ledger().is_used(ActionId::Relax));

    let AckOutcome::Resolved(feedback) = session.acknowledge_event() else {
        panic!("outing should resolve on acknowledge");
    };
    assert_eq!(feedback.tone, Valence::Negative);
    assert_eq!(session.score(), 0);
    assert_eq!(session.stats().get(Attribute::Energy), 40);
    assert_eq!(session.stats().get(Attribute::Health), 55);
    assert!(session.ledger().is_used(ActionId::Relax));
    assert_eq!(session.current_room(), RoomId::Living);
    // The outing never feeds the streak.
    assert_eq!(session.streak().consecutive_good_actions, 1);
    assert_eq!(session.streak().consecutive_bad_actions, 0);

    assert!(matches!(
        session.request(ActionId::Relax),
        RequestOutcome::Rejected(_)
    ));
}

#[test]
fn unknown_actions_resolve_without_effects() {
    let mut session = quiet_session();
    let before = session.state().clone();
    let RequestOutcome::AwaitingConfirmation(prompt) = session.request_action("skydive") else {
        panic!("unknown ids still reach confirmation");
    };
    assert_eq!(prompt.action_id, "skydive");
    let ConfirmOutcome::Resolved(feedback) = session.confirm_pending(true) else {
        panic!("unknown ids resolve");
    };
    assert_eq!(feedback.points, 0);
    assert!(feedback.message.is_empty());
    assert_eq!(before.stats.mood(), Mood::Happy);
    assert_eq!(session.mood(), Mood::Relaxed);
    assert!(session.stats().iter().eq(before.stats.iter()));
    assert_eq!(session.score(), before.score);
    assert_eq!(session.streak(), &before.streak);
    assert_eq!(session.ledger(), &before.ledger);
    assert_eq!(session.last_action(), None);
}

#[test]
fn commands_without_anything_pending_are_harmless() {
    let mut session = quiet_session();
    assert_eq!(session.confirm_pending(true), ConfirmOutcome::NothingPending);
    assert_eq!(session.confirm_pending(false), ConfirmOutcome::NothingPending);
    assert_eq!(session.acknowledge_event(), AckOutcome::NothingPending);

    session.request(ActionId::Eat);
    assert_eq!(session.confirm_pending(false), ConfirmOutcome::Cancelled);
    assert_eq!(session.score(), 0);
    assert!(!session.ledger().is_used(ActionId::Eat));
    assert_eq!(perform(&mut session, ActionId::Eat), -15);
    assert_eq!(session.score(), 0);
}

#[test]
fn attributes_stay_bounded_over_a_long_week() {
    let mut session = quiet_session();
    for _ in 0..7 {
        for action in ActionId::ALL {
            if let RequestOutcome::AwaitingConfirmation(_) = session.request(action) {
                session.confirm_pending(true);
            }
        }
        let day = session.clock().day();
        while session.clock().day() == day {
            session.tick();
        }
        for (attribute, value) in session.stats().iter() {
            assert!((0..=100).contains(&value), "{attribute} = {value}");
        }
    }
    assert_eq!(session.clock().day(), 8);
}
