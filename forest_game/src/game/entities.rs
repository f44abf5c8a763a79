use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::constants::{
    EXCHANGE_VALUE, MAX_EXCHANGES_PER_ROUND, PLAYER_COUNT, REPLANT_YIELD, STARTING_WOODCUTTERS,
    VICTORY_POINT_COST, WOODCUTTER_COST,
};

/// Seat index of a player, `0` or `1`.
pub type PlayerIndex = usize;

/// Placeholder for tree counts (forest size, harvests, replants).
pub type Trees = u32;

/// Victory points can go negative after the Hubbert penalty.
pub type VictoryPoints = i64;

/// Human-facing seat label ("Player 1" for index 0).
#[must_use]
pub fn seat_label(player: PlayerIndex) -> String {
    format!("Player {}", player + 1)
}

/// Scenario rule set chosen at game creation.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// No special rule.
    #[default]
    OvershootAndCollapse,
    /// Extra woodcutters cost a victory point each at game end.
    HubbertCurve,
    /// Periodic victory point bonus proportional to the standing forest.
    Sustainable,
}

impl Variant {
    pub const ALL: [Self; 3] = [
        Self::OvershootAndCollapse,
        Self::HubbertCurve,
        Self::Sustainable,
    ];

    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::OvershootAndCollapse => 1,
            Self::HubbertCurve => 2,
            Self::Sustainable => 3,
        }
    }

    /// Unknown codes fall back to the baseline scenario.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            2 => Self::HubbertCurve,
            3 => Self::Sustainable,
            _ => Self::OvershootAndCollapse,
        }
    }

    /// Lenient parse of raw form input. Anything unparseable is variant 1.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::OvershootAndCollapse => "Overshoot & Collapse",
            Self::HubbertCurve => "Hubbert Curve",
            Self::Sustainable => "Sustainable Scenario",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseVariantError;

impl fmt::Display for ParseVariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown scenario variant")
    }
}

impl std::error::Error for ParseVariantError {}

impl FromStr for Variant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "overshoot" | "overshoot_and_collapse" => Ok(Self::OvershootAndCollapse),
            "2" | "hubbert" | "hubbert_curve" => Ok(Self::HubbertCurve),
            "3" | "sustainable" => Ok(Self::Sustainable),
            _ => Err(ParseVariantError),
        }
    }
}

/// Per-player inventory and per-turn/per-round counters.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerState {
    pub woodcutters: u32,
    pub victory_points: VictoryPoints,
    /// Gross score, never reduced by penalties.
    pub total_victory_points_gained: VictoryPoints,
    pub harvested_trees: Trees,
    pub replanted_this_round: Trees,
    pub exchanges_this_round: u8,
    pub has_harvested_this_turn: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            woodcutters: STARTING_WOODCUTTERS,
            victory_points: 0,
            total_victory_points_gained: 0,
            harvested_trees: 0,
            replanted_this_round: 0,
            exchanges_this_round: 0,
            has_harvested_this_turn: false,
        }
    }

    /// Most victory points the held trees can buy.
    #[must_use]
    pub const fn max_victory_points(&self) -> u32 {
        self.harvested_trees / VICTORY_POINT_COST
    }

    /// Most woodcutters the held trees can buy.
    #[must_use]
    pub const fn max_woodcutters(&self) -> u32 {
        self.harvested_trees / WOODCUTTER_COST
    }

    #[must_use]
    pub const fn exchange_check(&self) -> ExchangeOutcome {
        if self.exchanges_this_round >= MAX_EXCHANGES_PER_ROUND {
            ExchangeOutcome::Limit
        } else if self.woodcutters <= STARTING_WOODCUTTERS {
            ExchangeOutcome::MinCapacity
        } else {
            ExchangeOutcome::Exchanged
        }
    }

    pub(crate) fn award(&mut self, points: VictoryPoints) {
        self.victory_points += points;
        self.total_victory_points_gained += points;
    }

    pub(crate) fn reset_round(&mut self) {
        self.replanted_this_round = 0;
        self.exchanges_this_round = 0;
    }

    /// Converts leftover harvested trees at the 2:1 rate. Returns the points
    /// gained.
    pub(crate) fn cash_out(&mut self) -> VictoryPoints {
        let gained = VictoryPoints::from(self.max_victory_points());
        self.award(gained);
        self.harvested_trees = 0;
        gained
    }

    /// Hubbert penalty: one point per woodcutter beyond the first.
    #[must_use]
    pub const fn hubbert_penalty(&self) -> VictoryPoints {
        self.woodcutters.saturating_sub(STARTING_WOODCUTTERS) as VictoryPoints
    }

    pub(crate) fn round_stats(&self) -> PlayerRoundStats {
        PlayerRoundStats {
            replanted: self.replanted_this_round,
            harvested: self.harvested_trees,
            woodcutters: self.woodcutters,
            victory_points: self.victory_points,
        }
    }
}

/// One player's columns in a round snapshot.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlayerRoundStats {
    pub replanted: Trees,
    pub harvested: Trees,
    pub woodcutters: u32,
    pub victory_points: VictoryPoints,
}

/// State captured at the end of each completed round, after regrowth.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RoundSnapshot {
    pub round: u32,
    pub trees: Trees,
    pub players: [PlayerRoundStats; PLAYER_COUNT],
}

/// An action the current player may take.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(tag = "type", content = "amount", rename_all = "snake_case")]
pub enum Action {
    Harvest,
    Replant(Trees),
    #[serde(rename = "buy_vp")]
    BuyVictoryPoints(u32),
    #[serde(rename = "buy_wc")]
    BuyWoodcutters(u32),
    #[serde(rename = "exchange_wc")]
    ExchangeWoodcutter,
    EndTurn,
}

impl Action {
    /// Short stable label, used for metrics and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Harvest => "harvest",
            Self::Replant(_) => "replant",
            Self::BuyVictoryPoints(_) => "buy_vp",
            Self::BuyWoodcutters(_) => "buy_wc",
            Self::ExchangeWoodcutter => "exchange_wc",
            Self::EndTurn => "end_turn",
        }
    }

    /// Builds an action from a raw `kind` label and a lenient amount.
    ///
    /// Returns `None` for an unknown label. Amounts go through
    /// [`parse_amount`].
    #[must_use]
    pub fn from_raw(kind: &str, amount: Option<&serde_json::Value>) -> Option<Self> {
        let action = match kind.trim() {
            "harvest" => Self::Harvest,
            "replant" => Self::Replant(parse_amount(amount)),
            "buy_vp" => Self::BuyVictoryPoints(parse_amount(amount)),
            "buy_wc" => Self::BuyWoodcutters(parse_amount(amount)),
            "exchange_wc" => Self::ExchangeWoodcutter,
            "end_turn" => Self::EndTurn,
            _ => return None,
        };
        Some(action)
    }

    /// Message shown when the amount of this action is out of bounds.
    #[must_use]
    pub const fn rejection_message(&self) -> &'static str {
        match self {
            Self::Replant(_) => "Invalid replant amount.",
            Self::BuyVictoryPoints(_) => "Invalid amount for buying VP.",
            Self::BuyWoodcutters(_) => "Invalid amount for buying woodcutters.",
            _ => "Invalid action.",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Harvest => "harvests".to_string(),
            Self::Replant(amount) => format!("replants {amount}"),
            Self::BuyVictoryPoints(amount) => format!("buys {amount} VP"),
            Self::BuyWoodcutters(amount) => format!("buys {amount} woodcutter(s)"),
            Self::ExchangeWoodcutter => "exchanges a woodcutter".to_string(),
            Self::EndTurn => "ends their turn".to_string(),
        };
        write!(f, "{repr}")
    }
}

/// Three-way result of exchanging a woodcutter for victory points.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeOutcome {
    Exchanged,
    /// Already exchanged the maximum this round.
    Limit,
    /// Only one woodcutter left.
    MinCapacity,
}

impl ExchangeOutcome {
    #[must_use]
    pub const fn is_exchanged(self) -> bool {
        matches!(self, Self::Exchanged)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exchanged => "exchanged",
            Self::Limit => "limit",
            Self::MinCapacity => "min_capacity",
        }
    }
}

impl fmt::Display for ExchangeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Exchanged => format!("Exchanged 1 Woodcutter for {EXCHANGE_VALUE} VP"),
            Self::Limit => format!(
                "You can only exchange {MAX_EXCHANGES_PER_ROUND} woodcutters per round."
            ),
            Self::MinCapacity => {
                format!("You must keep at least {STARTING_WOODCUTTERS} woodcutter.")
            }
        };
        write!(f, "{repr}")
    }
}

/// What an applied action produced.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Trees actually harvested, after clamping to the forest.
    Harvested { amount: Trees },
    Accepted,
    /// Amount out of bounds. Nothing changed.
    Rejected,
    Exchange { outcome: ExchangeOutcome },
    TurnEnded { round_completed: bool },
}

impl ActionOutcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        match self {
            Self::Rejected => false,
            Self::Exchange { outcome } => outcome.is_exchanged(),
            _ => true,
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Harvested { .. } => "harvested",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Exchange { outcome } => outcome.as_str(),
            Self::TurnEnded { .. } => "turn_ended",
        }
    }
}

/// Outcome of a finished game.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Player(PlayerIndex),
    Draw,
}

impl Winner {
    #[must_use]
    pub fn from_scores(scores: &[VictoryPoints; PLAYER_COUNT]) -> Self {
        match scores[0].cmp(&scores[1]) {
            std::cmp::Ordering::Greater => Self::Player(0),
            std::cmp::Ordering::Less => Self::Player(1),
            std::cmp::Ordering::Equal => Self::Draw,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player(player) => write!(f, "{}", seat_label(*player)),
            Self::Draw => write!(f, "Draw"),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FinalScores {
    pub scores: [VictoryPoints; PLAYER_COUNT],
    pub winner: Winner,
}

impl FinalScores {
    #[must_use]
    pub fn new(scores: [VictoryPoints; PLAYER_COUNT]) -> Self {
        Self {
            scores,
            winner: Winner::from_scores(&scores),
        }
    }
}

/// Why the game ended.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverCause {
    /// A harvest took the last tree.
    ForestDepleted,
    /// Round limit reached (or the forest was empty at round end).
    FinalRound,
    /// The host finalized a game still in progress.
    Concluded,
}

/// Where the game currently stands.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    AwaitingHarvest { player: PlayerIndex },
    PostHarvest { player: PlayerIndex },
    GameOver { result: FinalScores },
}

impl Phase {
    /// The player expected to act, if any.
    #[must_use]
    pub const fn acting_player(&self) -> Option<PlayerIndex> {
        match self {
            Self::AwaitingHarvest { player } | Self::PostHarvest { player } => Some(*player),
            Self::GameOver { .. } => None,
        }
    }
}

/// Trees that will regrow from replanting `amount`.
#[must_use]
pub const fn regrowth_for(amount: Trees) -> Trees {
    amount * REPLANT_YIELD
}

/// Lenient amount parsing for raw form or JSON input.
///
/// Anything that isn't a non-negative integer fitting in `u32` becomes `0`.
#[must_use]
pub fn parse_amount(raw: Option<&serde_json::Value>) -> u32 {
    match raw {
        Some(serde_json::Value::Number(n)) => {
            n.as_u64().and_then(|v| u32::try_from(v).ok()).unwrap_or(0)
        }
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
