//! Line commands from the terminal

use crate::game::{GameKind, LocalInput, PlayerMove};

/// Parse one line of player input for `game`. Unrecognised lines yield `None`.
pub fn parse_command(game: GameKind, line: &str) -> Option<LocalInput> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("forfeit") || line.eq_ignore_ascii_case("quit") {
        return Some(LocalInput::Forfeit);
    }

    let mv = match game {
        GameKind::TicTacToe => PlayerMove::Cell(line.parse().ok()?),
        GameKind::ConnectFour => PlayerMove::Column(line.parse().ok()?),
        GameKind::Rps => PlayerMove::Throw(line.parse().ok()?),
    };
    Some(LocalInput::Move(mv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Choice;

    #[test]
    fn numbers_map_to_board_moves() {
        assert_eq!(
            parse_command(GameKind::TicTacToe, " 4 "),
            Some(LocalInput::Move(PlayerMove::Cell(4)))
        );
        assert_eq!(
            parse_command(GameKind::ConnectFour, "6"),
            Some(LocalInput::Move(PlayerMove::Column(6)))
        );
    }

    #[test]
    fn throws_accept_names_and_initials() {
        assert_eq!(
            parse_command(GameKind::Rps, "Paper"),
            Some(LocalInput::Move(PlayerMove::Throw(Choice::Paper)))
        );
        assert_eq!(
            parse_command(GameKind::Rps, "s"),
            Some(LocalInput::Move(PlayerMove::Throw(Choice::Scissors)))
        );
        assert_eq!(parse_command(GameKind::Rps, "lizard"), None);
    }

    #[test]
    fn forfeit_in_any_game() {
        assert_eq!(
            parse_command(GameKind::ConnectFour, "forfeit"),
            Some(LocalInput::Forfeit)
        );
        assert_eq!(parse_command(GameKind::TicTacToe, "x"), None);
    }
}
