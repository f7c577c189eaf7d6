//! Board configuration (.json format)

use crate::core::{AbilityKind, AbilityOffer, Board, Cell, Element, EntityStore, Pawn, Team, TeamPath};
use crate::{LudoError, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fs;
use std::path::Path;

/// Largest ring a board may declare
pub const MAX_RING_SIZE: usize = 1024;

/// Longest safe lane a team may declare
pub const MAX_SAFE_LANE_LENGTH: usize = 64;

/// Most pawns a team may field
pub const MAX_PAWNS_PER_TEAM: usize = 16;

fn default_pawns_per_team() -> usize {
    4
}

/// One playing team and where its path joins the ring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamConfig {
    pub team: Team,
    pub entry_index: usize,
    pub safe_lane_length: usize,
}

/// An ability offer placed on a board cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferConfig {
    pub cell: Cell,
    pub ability: AbilityKind,
    pub element: Element,
}

/// Serializable description of a board
///
/// ```json
/// {
///   "ring_size": 52,
///   "safe_stars": [0, 8],
///   "teams": [{ "team": "red", "entry_index": 0, "safe_lane_length": 4 }],
///   "offers": [{ "cell": { "ring": 6 }, "ability": "protection", "element": "earth" }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub ring_size: usize,

    #[serde(default = "default_pawns_per_team")]
    pub pawns_per_team: usize,

    #[serde(default)]
    pub safe_stars: Vec<usize>,

    pub teams: Vec<TeamConfig>,

    /// Defaults to the order of `teams`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_order: Option<Vec<Team>>,

    /// Later entries for the same cell replace earlier ones
    #[serde(default)]
    pub offers: Vec<OfferConfig>,
}

impl BoardConfig {
    /// The standard four-team board: 52 ring cells, four-cell safe lanes
    pub fn classic() -> Self {
        let team = |team, entry_index| TeamConfig {
            team,
            entry_index,
            safe_lane_length: 4,
        };
        let offer = |ring, ability, element| OfferConfig {
            cell: Cell::Ring(ring),
            ability,
            element,
        };

        BoardConfig {
            ring_size: 52,
            pawns_per_team: 4,
            safe_stars: vec![0, 8, 13, 21, 26, 34, 39, 47],
            teams: vec![
                team(Team::Red, 0),
                team(Team::Green, 13),
                team(Team::Blue, 26),
                team(Team::Yellow, 39),
            ],
            turn_order: None,
            offers: vec![
                offer(6, AbilityKind::Protection, Element::Earth),
                offer(19, AbilityKind::ExtraDeploy, Element::Fire),
                offer(32, AbilityKind::ExtraMove, Element::Air),
                offer(45, AbilityKind::CaptureSynergy, Element::Water),
            ],
        }
    }

    /// Parse a configuration from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: BoardConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Async variant of [`BoardConfig::load_from_file`]
    pub async fn load_from_file_async(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations no game could be played on
    pub fn validate(&self) -> Result<()> {
        if self.ring_size < 4 {
            return invalid(format!("ring_size must be at least 4, got {}", self.ring_size));
        }
        if self.ring_size > MAX_RING_SIZE {
            return invalid(format!(
                "ring_size {} exceeds the maximum of {}",
                self.ring_size, MAX_RING_SIZE
            ));
        }
        if self.teams.is_empty() {
            return invalid("at least one team is required".to_string());
        }
        if self.pawns_per_team == 0 {
            return invalid("pawns_per_team must be positive".to_string());
        }
        if self.pawns_per_team > MAX_PAWNS_PER_TEAM {
            return invalid(format!(
                "pawns_per_team {} exceeds the maximum of {}",
                self.pawns_per_team, MAX_PAWNS_PER_TEAM
            ));
        }

        let mut seen = FxHashSet::default();
        for team in &self.teams {
            if !seen.insert(team.team) {
                return invalid(format!("team {} is configured twice", team.team));
            }
            if team.entry_index >= self.ring_size {
                return invalid(format!(
                    "{} entry_index {} is outside the ring (size {})",
                    team.team, team.entry_index, self.ring_size
                ));
            }
            if team.safe_lane_length == 0 {
                return invalid(format!("{} safe_lane_length must be positive", team.team));
            }
            if team.safe_lane_length > MAX_SAFE_LANE_LENGTH {
                return invalid(format!(
                    "{} safe_lane_length {} exceeds the maximum of {}",
                    team.team, team.safe_lane_length, MAX_SAFE_LANE_LENGTH
                ));
            }
        }

        if let Some(star) = self.safe_stars.iter().find(|s| **s >= self.ring_size) {
            return invalid(format!("safe star {} is outside the ring", star));
        }

        for offer in &self.offers {
            self.validate_offer_cell(offer.cell)?;
        }

        if let Some(order) = &self.turn_order {
            let mut listed = FxHashSet::default();
            for team in order {
                if !seen.contains(team) {
                    return invalid(format!("turn_order names unconfigured team {}", team));
                }
                if !listed.insert(*team) {
                    return invalid(format!("turn_order lists {} twice", team));
                }
            }
            if listed.len() != seen.len() {
                return invalid("turn_order must list every configured team".to_string());
            }
        }

        Ok(())
    }

    fn validate_offer_cell(&self, cell: Cell) -> Result<()> {
        match cell {
            Cell::Ring(idx) if idx < self.ring_size => Ok(()),
            Cell::Ring(idx) => invalid(format!("offer cell ring {} is outside the ring", idx)),
            Cell::Lane { team, index } => match self.teams.iter().find(|t| t.team == team) {
                Some(t) if index < t.safe_lane_length => Ok(()),
                Some(_) => invalid(format!("offer cell lane {} {} is past the lane end", team, index)),
                None => invalid(format!("offer cell lane belongs to unconfigured team {}", team)),
            },
            Cell::Finish(team) => invalid(format!("offers cannot be placed on {} finish", team)),
        }
    }

    /// Validate, then build the board and its pawns (team by team, all in start)
    pub fn build(&self) -> Result<(Board, EntityStore<Pawn>)> {
        self.validate()?;

        let paths = self
            .teams
            .iter()
            .map(|t| TeamPath {
                team: t.team,
                entry_index: t.entry_index,
                safe_lane_length: t.safe_lane_length,
            })
            .collect();
        let safe_stars: FxHashSet<usize> = self.safe_stars.iter().copied().collect();
        let mut offers = FxHashMap::default();
        for offer in &self.offers {
            offers.insert(offer.cell, AbilityOffer::new(offer.ability, offer.element));
        }

        let mut pawns = EntityStore::new();
        for team in &self.teams {
            for _ in 0..self.pawns_per_team {
                pawns.push(Pawn::new(team.team));
            }
        }

        let board = Board::new(self.ring_size, self.pawns_per_team, paths, safe_stars, offers);
        Ok((board, pawns))
    }

    /// Turn order, falling back to team declaration order
    pub fn resolved_turn_order(&self) -> SmallVec<[Team; 4]> {
        match &self.turn_order {
            Some(order) => order.iter().copied().collect(),
            None => self.teams.iter().map(|t| t.team).collect(),
        }
    }
}

fn invalid<T>(message: String) -> Result<T> {
    Err(LudoError::InvalidConfig(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_is_valid() {
        let config = BoardConfig::classic();
        config.validate().unwrap();
        let (board, pawns) = config.build().unwrap();
        assert_eq!(board.ring_size(), 52);
        assert_eq!(board.offer_count(), 4);
        assert_eq!(pawns.len(), 16);
        assert!(board.is_safe_star(13));
        assert_eq!(
            config.resolved_turn_order().as_slice(),
            &[Team::Red, Team::Green, Team::Blue, Team::Yellow]
        );
    }

    #[test]
    fn test_parse_minimal_json_uses_defaults() {
        let json = r#"{
            "ring_size": 20,
            "teams": [
                { "team": "red", "entry_index": 0, "safe_lane_length": 3 },
                { "team": "blue", "entry_index": 10, "safe_lane_length": 3 }
            ]
        }"#;
        let config = BoardConfig::from_json_str(json).unwrap();
        assert_eq!(config.pawns_per_team, 4);
        assert!(config.safe_stars.is_empty());
        assert!(config.offers.is_empty());
    }

    #[test]
    fn test_parse_offer_cells() {
        let json = r#"{
            "ring_size": 20,
            "teams": [{ "team": "red", "entry_index": 0, "safe_lane_length": 3 }],
            "offers": [
                { "cell": { "ring": 5 }, "ability": "extra_move", "element": "air" },
                { "cell": { "lane": { "team": "red", "index": 1 } }, "ability": "protection", "element": "fire" }
            ]
        }"#;
        let config = BoardConfig::from_json_str(json).unwrap();
        let (board, _) = config.build().unwrap();
        assert_eq!(
            board.offer_at(Cell::Lane { team: Team::Red, index: 1 }),
            Some(&AbilityOffer::new(AbilityKind::Protection, Element::Fire))
        );
    }

    #[test]
    fn test_duplicate_offer_last_wins() {
        let mut config = BoardConfig::classic();
        config.offers.push(OfferConfig {
            cell: Cell::Ring(6),
            ability: AbilityKind::ExtraMove,
            element: Element::Air,
        });
        let (board, _) = config.build().unwrap();
        assert_eq!(board.offer_count(), 4);
        assert_eq!(board.offer_at(Cell::Ring(6)).unwrap().kind, AbilityKind::ExtraMove);
    }

    fn assert_invalid(config: BoardConfig) {
        match config.validate() {
            Err(LudoError::InvalidConfig(_)) => {}
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_topology() {
        let mut small = BoardConfig::classic();
        small.ring_size = 3;
        small.teams.truncate(1);
        small.teams[0].entry_index = 0;
        small.safe_stars.clear();
        small.offers.clear();
        assert_invalid(small);

        let mut no_teams = BoardConfig::classic();
        no_teams.teams.clear();
        assert_invalid(no_teams);

        let mut duplicate = BoardConfig::classic();
        duplicate.teams[1].team = Team::Red;
        assert_invalid(duplicate);

        let mut entry = BoardConfig::classic();
        entry.teams[2].entry_index = 52;
        assert_invalid(entry);

        let mut lane = BoardConfig::classic();
        lane.teams[0].safe_lane_length = 0;
        assert_invalid(lane);

        let mut star = BoardConfig::classic();
        star.safe_stars.push(99);
        assert_invalid(star);

        let mut pawns = BoardConfig::classic();
        pawns.pawns_per_team = 0;
        assert_invalid(pawns);
    }

    #[test]
    fn test_rejects_oversized_topology() {
        let json = r#"{
            "ring_size": 8,
            "teams": [{ "team": "red", "entry_index": 0, "safe_lane_length": 18446744073709551615 }]
        }"#;
        match BoardConfig::from_json_str(json) {
            Err(LudoError::InvalidConfig(msg)) => assert!(msg.contains("safe_lane_length")),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }

        let mut lane = BoardConfig::classic();
        lane.teams[1].safe_lane_length = MAX_SAFE_LANE_LENGTH + 1;
        assert_invalid(lane);

        let mut ring = BoardConfig::classic();
        ring.ring_size = MAX_RING_SIZE + 1;
        assert_invalid(ring);

        let mut pawns = BoardConfig::classic();
        pawns.pawns_per_team = MAX_PAWNS_PER_TEAM + 1;
        assert_invalid(pawns);

        let mut widest = BoardConfig::classic();
        widest.pawns_per_team = MAX_PAWNS_PER_TEAM;
        for team in &mut widest.teams {
            team.safe_lane_length = MAX_SAFE_LANE_LENGTH;
        }
        assert!(widest.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_offer_cells() {
        let bad_cells = [
            Cell::Ring(52),
            Cell::Finish(Team::Red),
            Cell::Lane { team: Team::Red, index: 4 },
        ];
        for cell in bad_cells {
            let mut config = BoardConfig::classic();
            config.offers.push(OfferConfig {
                cell,
                ability: AbilityKind::Protection,
                element: Element::Earth,
            });
            assert_invalid(config);
        }

        let mut config = BoardConfig::classic();
        config.teams.truncate(2);
        config.offers = vec![OfferConfig {
            cell: Cell::Lane { team: Team::Yellow, index: 0 },
            ability: AbilityKind::Protection,
            element: Element::Earth,
        }];
        assert_invalid(config);
    }

    #[test]
    fn test_turn_order() {
        let mut config = BoardConfig::classic();
        config.turn_order = Some(vec![Team::Blue, Team::Red, Team::Yellow, Team::Green]);
        config.validate().unwrap();
        assert_eq!(config.resolved_turn_order()[0], Team::Blue);

        config.turn_order = Some(vec![Team::Blue, Team::Blue, Team::Yellow, Team::Green]);
        assert_invalid(config.clone());

        config.turn_order = Some(vec![Team::Blue, Team::Red]);
        assert_invalid(config);
    }

    #[test]
    fn test_unknown_team_name_is_json_error() {
        let json = r#"{ "ring_size": 20, "teams": [{ "team": "purple", "entry_index": 0, "safe_lane_length": 3 }] }"#;
        assert!(matches!(
            BoardConfig::from_json_str(json),
            Err(LudoError::JsonError(_))
        ));
    }
}
