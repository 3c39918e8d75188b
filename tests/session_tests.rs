//! Local-mode session scenarios driven on the virtual clock

use ark_arena::game::{
    ClockState, Effect, GameKind, GameState, LocalInput, MatchSession, Notice, OpponentPolicy,
    Outcome, PlayerMove, SessionPhase, SessionSettings, Side,
};
use ark_arena::game::rps::Choice;
use ark_arena::rewards::RewardDelta;

fn scripted(game: GameKind, moves: Vec<PlayerMove>) -> SessionSettings {
    let mut settings = SessionSettings::local(game);
    settings.opponent = OpponentPolicy::Scripted { moves, seed: 1 };
    settings
}

fn notices(effects: &[Effect]) -> Vec<Notice> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Notice(notice) => Some(notice.clone()),
            _ => None,
        })
        .collect()
}

fn settlements(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|effect| matches!(effect, Effect::Settle(_)))
        .count()
}

fn cell(session: &mut MatchSession, index: usize, now: u64) {
    session.handle_input(LocalInput::Move(PlayerMove::Cell(index)), now);
}

fn board(session: &MatchSession) -> &ark_arena::game::TicTacToe {
    session.game().as_tictactoe().unwrap()
}

#[test]
fn fourth_mark_evicts_oldest_before_placing() {
    let ai = [1, 2, 5].map(PlayerMove::Cell).to_vec();
    let mut session = MatchSession::new(scripted(GameKind::TicTacToe, ai), 0);

    cell(&mut session, 0, 0);
    session.advance(700);
    cell(&mut session, 3, 800);
    session.advance(1500);
    cell(&mut session, 8, 1600);
    session.advance(2300);
    assert_eq!(board(&session).mark_count(Side::A), 3);
    assert_eq!(board(&session).mark_count(Side::B), 3);
    session.drain_effects();

    cell(&mut session, 6, 2400);
    let effects = session.drain_effects();
    assert_eq!(
        notices(&effects),
        vec![Notice::PieceRemoved {
            side: Side::A,
            cell: 0
        }]
    );
    assert_eq!(board(&session).cell(0), None);
    assert_eq!(board(&session).cell(6), None);
    assert!(session.is_gated());
    assert_eq!(session.clock().state(), ClockState::Paused);

    session.advance(2800);
    let effects = session.drain_effects();
    assert_eq!(
        notices(&effects)[0],
        Notice::PiecePlaced {
            side: Side::A,
            cell: 6
        }
    );
    assert_eq!(board(&session).cell(6), Some(Side::A));
    assert_eq!(board(&session).mark_count(Side::A), 3);
    // 0-3-6 would have been a line had the eviction not come first
    assert_eq!(session.phase(), SessionPhase::Playing);
    assert_eq!(session.turn(), Side::B);
}

#[test]
fn input_is_ignored_during_animation_and_off_turn() {
    let ai = [1, 2, 5].map(PlayerMove::Cell).to_vec();
    let mut session = MatchSession::new(scripted(GameKind::TicTacToe, ai), 0);

    cell(&mut session, 0, 0);
    // Opponent is thinking
    cell(&mut session, 4, 100);
    assert_eq!(board(&session).cell(4), None);

    session.advance(700);
    assert_eq!(board(&session).cell(1), Some(Side::B));
    assert_eq!(session.turn(), Side::A);

    // Occupied cell: silently rejected, still our turn
    cell(&mut session, 1, 750);
    assert_eq!(session.turn(), Side::A);
    assert_eq!(board(&session).cell(1), Some(Side::B));
}

#[test]
fn local_win_finishes_once_with_stake_rewards() {
    let ai = [3, 4].map(PlayerMove::Cell).to_vec();
    let mut settings = scripted(GameKind::TicTacToe, ai);
    settings.stake = Some(10);
    settings.local_xp = 1000;
    settings.opponent_xp = 800;
    let mut session = MatchSession::new(settings, 0);

    cell(&mut session, 0, 0);
    session.advance(700);
    cell(&mut session, 1, 800);
    session.advance(1500);
    cell(&mut session, 2, 1600);

    assert_eq!(session.phase(), SessionPhase::Finished);
    assert_eq!(session.outcome(), Some(Outcome::Win));
    assert_eq!(session.rewards(), Some(RewardDelta { xp: 8, ark: 20 }));

    let effects = session.drain_effects();
    assert_eq!(settlements(&effects), 1);
    let Some(Effect::Settle(settlement)) =
        effects.iter().find(|e| matches!(e, Effect::Settle(_)))
    else {
        panic!("expected a settlement");
    };
    assert_eq!(settlement.result, None);
    assert!(!settlement.refresh_balance);
    // Local play has no transport to release
    assert!(!effects.contains(&Effect::CloseTransport));

    // Nothing moves after the end
    cell(&mut session, 5, 1700);
    session.tick(2000);
    session.handle_input(LocalInput::Forfeit, 2100);
    assert!(session.drain_effects().is_empty());
    assert_eq!(session.outcome(), Some(Outcome::Win));
}

#[test]
fn forfeit_is_an_immediate_loss() {
    let mut settings = SessionSettings::local(GameKind::ConnectFour);
    settings.stake = Some(10);
    settings.local_xp = 1000;
    settings.opponent_xp = 800;
    let mut session = MatchSession::new(settings, 0);

    session.handle_input(LocalInput::Forfeit, 5000);
    assert_eq!(session.outcome(), Some(Outcome::Loss));
    assert_eq!(session.rewards(), Some(RewardDelta { xp: -24, ark: -10 }));
    let effects = session.drain_effects();
    // Local forfeits have nobody to notify
    assert!(!effects.iter().any(|e| matches!(e, Effect::Send(_))));
}

#[test]
fn free_play_pays_nothing() {
    let mut session = MatchSession::new(SessionSettings::local(GameKind::Rps), 0);
    session.handle_input(LocalInput::Forfeit, 0);
    assert_eq!(session.rewards(), Some(RewardDelta::ZERO));
}

#[test]
fn clock_expiry_after_thirty_one_ticks() {
    let mut session = MatchSession::new(SessionSettings::local(GameKind::TicTacToe), 0);
    assert_eq!(session.clock().owner(), Side::A);

    for second in 1..=30 {
        session.tick(second * 1000);
        assert_eq!(session.phase(), SessionPhase::Playing, "second {second}");
    }
    assert_eq!(session.clock().remaining(), 0);

    session.tick(31_000);
    assert_eq!(session.phase(), SessionPhase::Finished);
    assert_eq!(session.outcome(), Some(Outcome::Loss));

    session.tick(32_000);
    session.tick(33_000);
    let effects = session.drain_effects();
    assert_eq!(settlements(&effects), 1);
    let finished = notices(&effects)
        .into_iter()
        .filter(|n| matches!(n, Notice::Finished { .. }))
        .count();
    assert_eq!(finished, 1);
    assert!(notices(&effects).contains(&Notice::ClockExpired { side: Side::A }));
}

#[test]
fn opponent_running_out_of_time_is_a_win() {
    // Opponent thinks for longer than the whole turn budget
    let mut settings = SessionSettings::local(GameKind::TicTacToe);
    settings.pacing.ai_think_ms = 60_000;
    let mut session = MatchSession::new(settings, 0);

    cell(&mut session, 4, 0);
    assert_eq!(session.clock().owner(), Side::B);
    for second in 1..=31 {
        session.tick(second * 1000);
    }
    assert_eq!(session.outcome(), Some(Outcome::Win));
}

#[test]
fn connect_four_drop_gates_input_until_settled() {
    let ai = vec![PlayerMove::Column(3)];
    let mut session = MatchSession::new(scripted(GameKind::ConnectFour, ai), 0);

    session.handle_input(LocalInput::Move(PlayerMove::Column(3)), 0);
    let effects = session.drain_effects();
    assert!(notices(&effects).contains(&Notice::TokenDropped {
        side: Side::A,
        column: 3,
        row: 5
    }));
    assert!(session.is_gated());
    assert_eq!(session.turn(), Side::A);

    // Second drop while the token is falling
    session.handle_input(LocalInput::Move(PlayerMove::Column(0)), 100);
    let c4 = session.game().as_connect_four().unwrap();
    assert_eq!(c4.get(5, 0), None);

    session.advance(450);
    assert_eq!(session.turn(), Side::B);
    assert!(!session.is_gated());

    // Opponent thinks, drops, and its token settles
    session.advance(1150);
    let c4 = session.game().as_connect_four().unwrap();
    assert_eq!(c4.get(4, 3), Some(Side::B));
    assert_eq!(session.turn(), Side::B);
    session.advance(1600);
    assert_eq!(session.turn(), Side::A);
}

#[test]
fn connect_four_vertical_win() {
    let ai = [0, 0, 0].map(PlayerMove::Column).to_vec();
    let mut session = MatchSession::new(scripted(GameKind::ConnectFour, ai), 0);

    let mut now = 0;
    for _ in 0..3 {
        session.handle_input(LocalInput::Move(PlayerMove::Column(6)), now);
        now += 450 + 700 + 450;
        session.advance(now);
        now += 10;
    }
    session.handle_input(LocalInput::Move(PlayerMove::Column(6)), now);
    assert_eq!(session.phase(), SessionPhase::Playing);
    session.advance(now + 450);
    assert_eq!(session.outcome(), Some(Outcome::Win));
}

#[test]
fn rps_local_round_sequence() {
    let ai = vec![PlayerMove::Throw(Choice::Scissors)];
    let mut session = MatchSession::new(scripted(GameKind::Rps, ai), 0);

    session.handle_input(LocalInput::Move(PlayerMove::Throw(Choice::Rock)), 0);
    assert_eq!(session.clock().state(), ClockState::Paused);

    // A second throw in the same round is refused
    session.handle_input(LocalInput::Move(PlayerMove::Throw(Choice::Paper)), 10);
    let GameState::Rps(game) = session.game() else {
        panic!("expected rps");
    };
    assert_eq!(game.choice(Side::A), Some(Choice::Rock));
    session.drain_effects();

    session.advance(800);
    let effects = session.drain_effects();
    assert!(notices(&effects).contains(&Notice::ThrowsRevealed {
        round: 1,
        side_a: Choice::Rock,
        side_b: Choice::Scissors
    }));
    assert!(session.is_gated());

    session.advance(1800);
    let effects = session.drain_effects();
    assert!(notices(&effects).contains(&Notice::RoundScored {
        round: 1,
        result: Outcome::Win,
        local_wins: 1,
        opponent_wins: 0
    }));

    session.advance(3300);
    let effects = session.drain_effects();
    assert!(notices(&effects).contains(&Notice::RoundAdvanced { round: 2 }));
    assert!(!session.is_gated());
    assert_eq!(session.clock().state(), ClockState::Running);
    assert_eq!(session.clock().remaining(), 30);
}

#[test]
fn rps_first_to_five_ends_the_match() {
    let ai = vec![PlayerMove::Throw(Choice::Scissors); 5];
    let mut session = MatchSession::new(scripted(GameKind::Rps, ai), 0);

    let mut now = 0;
    for _ in 0..5 {
        session.handle_input(LocalInput::Move(PlayerMove::Throw(Choice::Rock)), now);
        now += 800 + 1000 + 1500;
        session.advance(now);
        now += 10;
    }

    assert_eq!(session.outcome(), Some(Outcome::Win));
    let GameState::Rps(game) = session.game() else {
        panic!("expected rps");
    };
    assert_eq!(game.wins(Side::A), 5);
    assert_eq!(game.round(), 5);
}

/// Columns for a full board without a line. Columns 0, 1, 4 and 5 end up
/// A,B,A,B,A,B from the bottom, columns 2, 3 and 6 the reverse, so no row,
/// column or diagonal holds four of one side.
fn drawn_fill() -> (Vec<usize>, Vec<usize>) {
    let mut local = Vec::new();
    let mut opponent = Vec::new();
    for (p, q) in [(0, 2), (1, 3), (4, 6)] {
        for _ in 0..3 {
            local.extend([p, q]);
            opponent.extend([q, p]);
        }
    }
    local.extend([5, 5, 5]);
    opponent.extend([5, 5, 5]);
    (local, opponent)
}

#[test]
fn connect_four_full_board_replays_from_starting_side() {
    let (local, opponent) = drawn_fill();
    let ai = opponent.into_iter().map(PlayerMove::Column).collect();
    let mut session = MatchSession::new(scripted(GameKind::ConnectFour, ai), 0);

    let mut now = 0;
    let mut seen = Vec::new();
    for column in local {
        session.handle_input(LocalInput::Move(PlayerMove::Column(column)), now);
        // Drop, opponent think, opponent drop
        now += 450 + 700 + 450;
        session.advance(now);
        seen.extend(notices(&session.drain_effects()));
        now += 10;
    }

    let resets: Vec<_> = seen
        .iter()
        .filter(|n| matches!(n, Notice::RoundReset { .. }))
        .cloned()
        .collect();
    assert_eq!(resets, vec![Notice::RoundReset { round: 2 }]);
    assert_eq!(session.phase(), SessionPhase::Playing);
    assert_eq!(session.turn(), Side::A);
    assert_eq!(session.clock().owner(), Side::A);

    let c4 = session.game().as_connect_four().unwrap();
    assert_eq!(c4.round(), 2);
    assert!(c4.cells().iter().all(Option::is_none));
}
