//! Player lookup and mark assignment for new games.

use derive_getters::Getters;
use rand::Rng;
use tracing::{debug, instrument, warn};

use crate::AssignmentError;
use crate::db::{GameRepository, Player};

/// Players per game.
pub const PLAYERS_PER_GAME: usize = 2;

/// Longest accepted player name, in characters.
pub const MAX_NAME_LEN: usize = 40;

/// Two distinct players bound to marks for one game.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Assignment {
    x: Player,
    o: Player,
}

impl Assignment {
    /// Splits into `(x, o)`.
    pub fn into_pair(self) -> (Player, Player) {
        (self.x, self.o)
    }
}

/// Checks the 1 to 40 character rule.
///
/// # Errors
///
/// Returns [`AssignmentError::InvalidPlayerName`] when the rule is broken.
pub fn validate_name(name: &str) -> Result<(), AssignmentError> {
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        warn!(len, "Rejected player name");
        return Err(AssignmentError::InvalidPlayerName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Fills the two player slots from the requested names.
///
/// Missing slots get `"Player {n}"`, counting on from `known_players`, and
/// skipping any name already requested in this call.
///
/// # Errors
///
/// - [`AssignmentError::TooManyPlayers`] for more than two names
/// - [`AssignmentError::InvalidPlayerName`] for an empty or overlong name
/// - [`AssignmentError::DuplicatePlayerName`] when both slots match
#[instrument]
pub fn resolve_names(
    requested: &[String],
    known_players: i64,
) -> Result<[String; PLAYERS_PER_GAME], AssignmentError> {
    if requested.len() > PLAYERS_PER_GAME {
        warn!(requested = requested.len(), "Too many players");
        return Err(AssignmentError::TooManyPlayers {
            requested: requested.len(),
        });
    }
    for name in requested {
        validate_name(name)?;
    }

    let mut n = known_players + 1;
    let mut synthesize = || loop {
        let candidate = format!("Player {n}");
        n += 1;
        if !requested.contains(&candidate) {
            return candidate;
        }
    };

    let first = requested.first().cloned().unwrap_or_else(&mut synthesize);
    let second = requested.get(1).cloned().unwrap_or_else(&mut synthesize);

    if first == second {
        warn!(name = %first, "Duplicate player name");
        return Err(AssignmentError::DuplicatePlayerName { name: first });
    }

    debug!(%first, %second, "Names resolved");
    Ok([first, second])
}

/// Randomly binds two players to X and O, each ordering with probability 1/2.
pub fn assign_marks<R: Rng + ?Sized>(first: Player, second: Player, rng: &mut R) -> Assignment {
    if rng.random_bool(0.5) {
        Assignment { x: first, o: second }
    } else {
        Assignment { x: second, o: first }
    }
}

/// Resolves player names against storage.
#[derive(Debug, Clone)]
pub struct PlayerRegistry {
    repository: GameRepository,
}

impl PlayerRegistry {
    /// Creates a registry backed by the given repository.
    pub fn new(repository: GameRepository) -> Self {
        Self { repository }
    }

    /// Resolves up to two names into two distinct stored players.
    ///
    /// Unknown names are created; missing names are synthesized. The pair
    /// keeps request order; marks are bound later by [`assign_marks`].
    ///
    /// # Errors
    ///
    /// See [`resolve_names`]; storage failures surface as
    /// [`AssignmentError::Db`].
    #[instrument(skip(self))]
    pub fn resolve_players(&self, names: &[String]) -> Result<(Player, Player), AssignmentError> {
        let known = if names.len() < PLAYERS_PER_GAME {
            self.repository.count_players()?
        } else {
            0
        };
        let [first, second] = resolve_names(names, known)?;

        let first = self.repository.get_or_create_player(&first)?;
        let second = self.repository.get_or_create_player(&second)?;
        debug!(first = first.id(), second = second.id(), "Players resolved");
        Ok((first, second))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn player(id: i32, name: &str) -> Player {
        crate::db::Player::for_tests(id, name, NaiveDateTime::default())
    }

    #[test]
    fn test_two_names_kept_in_order() {
        let resolved = resolve_names(&names(&["Matt", "Bob"]), 10).unwrap();
        assert_eq!(resolved, ["Matt".to_string(), "Bob".to_string()]);
    }

    #[test]
    fn test_missing_names_synthesized_from_count() {
        let resolved = resolve_names(&[], 0).unwrap();
        assert_eq!(resolved, ["Player 1".to_string(), "Player 2".to_string()]);

        let resolved = resolve_names(&names(&["Matt"]), 4).unwrap();
        assert_eq!(resolved, ["Matt".to_string(), "Player 5".to_string()]);
    }

    #[test]
    fn test_synthesized_name_skips_requested_name() {
        let resolved = resolve_names(&names(&["Player 3"]), 2).unwrap();
        assert_eq!(resolved, ["Player 3".to_string(), "Player 4".to_string()]);
    }

    #[test]
    fn test_too_many_players() {
        let err = resolve_names(&names(&["A", "B", "C"]), 0).unwrap_err();
        assert!(matches!(err, AssignmentError::TooManyPlayers { requested: 3 }));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = resolve_names(&names(&["Bob", "Bob"]), 0).unwrap_err();
        assert!(matches!(err, AssignmentError::DuplicatePlayerName { ref name } if name == "Bob"));
    }

    #[test]
    fn test_name_length_bounds() {
        assert!(validate_name("A").is_ok());
        assert!(validate_name(&"a".repeat(40)).is_ok());
        assert!(matches!(
            validate_name(""),
            Err(AssignmentError::InvalidPlayerName { .. })
        ));
        assert!(matches!(
            validate_name(&"a".repeat(41)),
            Err(AssignmentError::InvalidPlayerName { .. })
        ));
        // Characters, not bytes.
        assert!(validate_name(&"é".repeat(40)).is_ok());
    }

    #[test]
    fn test_assign_marks_is_seed_deterministic() {
        let a = assign_marks(player(1, "Matt"), player(2, "Bob"), &mut StdRng::seed_from_u64(7));
        let b = assign_marks(player(1, "Matt"), player(2, "Bob"), &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_assign_marks_produces_both_orderings() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut matt_x = 0;
        let mut bob_x = 0;
        for _ in 0..200 {
            let assignment = assign_marks(player(1, "Matt"), player(2, "Bob"), &mut rng);
            assert_ne!(assignment.x().id(), assignment.o().id());
            match assignment.x().name().as_str() {
                "Matt" => matt_x += 1,
                "Bob" => bob_x += 1,
                other => panic!("unexpected player {other}"),
            }
        }
        assert!(matt_x > 0 && bob_x > 0, "matt_x={matt_x} bob_x={bob_x}");
    }
}
