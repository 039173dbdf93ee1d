//! Memory-one strategies and the joint-history state space

use serde::{Deserialize, Serialize};

/// A move in the Prisoner's Dilemma
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    Cooperate,
    Defect,
}

/// The previous round's pair of moves.
///
/// The first move belongs to the player whose point of view is taken, so
/// `CooperateDefect` means "I cooperated, my opponent defected".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointState {
    CooperateCooperate,
    CooperateDefect,
    DefectCooperate,
    DefectDefect,
}

impl JointState {
    /// States in matrix order: CC, CD, DC, DD
    pub const ALL: [JointState; 4] = [
        JointState::CooperateCooperate,
        JointState::CooperateDefect,
        JointState::DefectCooperate,
        JointState::DefectDefect,
    ];

    pub fn index(self) -> usize {
        match self {
            JointState::CooperateCooperate => 0,
            JointState::CooperateDefect => 1,
            JointState::DefectCooperate => 2,
            JointState::DefectDefect => 3,
        }
    }

    pub fn from_moves(mine: Move, theirs: Move) -> Self {
        match (mine, theirs) {
            (Move::Cooperate, Move::Cooperate) => JointState::CooperateCooperate,
            (Move::Cooperate, Move::Defect) => JointState::CooperateDefect,
            (Move::Defect, Move::Cooperate) => JointState::DefectCooperate,
            (Move::Defect, Move::Defect) => JointState::DefectDefect,
        }
    }

    pub fn moves(self) -> (Move, Move) {
        match self {
            JointState::CooperateCooperate => (Move::Cooperate, Move::Cooperate),
            JointState::CooperateDefect => (Move::Cooperate, Move::Defect),
            JointState::DefectCooperate => (Move::Defect, Move::Cooperate),
            JointState::DefectDefect => (Move::Defect, Move::Defect),
        }
    }

    /// The same round seen from the opponent's seat
    pub fn mirrored(self) -> Self {
        match self {
            JointState::CooperateDefect => JointState::DefectCooperate,
            JointState::DefectCooperate => JointState::CooperateDefect,
            other => other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            JointState::CooperateCooperate => "CC",
            JointState::CooperateDefect => "CD",
            JointState::DefectCooperate => "DC",
            JointState::DefectDefect => "DD",
        }
    }
}

/// Cooperation probabilities of a memory-one player.
///
/// Entry `k` is the chance to cooperate when the previous round was
/// `JointState::ALL[k]`, seen from this player's seat. Every entry lies in
/// `[0, 1]`; construction and deserialization both enforce it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct StrategyVector([f64; 4]);

impl StrategyVector {
    /// Returns `None` if any probability is outside `[0, 1]` (or NaN)
    pub fn new(probabilities: [f64; 4]) -> Option<Self> {
        if probabilities.iter().all(|p| (0.0..=1.0).contains(p)) {
            Some(Self(probabilities))
        } else {
            None
        }
    }

    pub fn probabilities(&self) -> [f64; 4] {
        self.0
    }

    pub fn cooperate_after(&self, state: JointState) -> f64 {
        self.0[state.index()]
    }

    /// Mean cooperation probability over the four states
    pub fn generosity(&self) -> f64 {
        self.0.iter().sum::<f64>() / 4.0
    }

    /// Exactly (1, 0, 1, 0), no tolerance.
    pub fn is_tit_for_tat(&self) -> bool {
        self.0 == StrategyBase::TitForTat.probabilities()
    }
}

impl TryFrom<[f64; 4]> for StrategyVector {
    type Error = String;

    fn try_from(probabilities: [f64; 4]) -> Result<Self, Self::Error> {
        Self::new(probabilities)
            .ok_or_else(|| format!("probabilities {:?} must lie in [0, 1]", probabilities))
    }
}

impl From<StrategyVector> for [f64; 4] {
    fn from(vector: StrategyVector) -> Self {
        vector.0
    }
}

impl From<StrategyBase> for StrategyVector {
    fn from(base: StrategyBase) -> Self {
        Self(base.probabilities())
    }
}

/// Classic strategies that fit the memory-one form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyBase {
    /// Copy opponent's last move.
    TitForTat,
    /// Always defect, never cooperate.
    AlwaysDefect,
    /// Always cooperate, never defect.
    AlwaysCooperate,
    /// Cooperate only after mutual cooperation.
    GrimTrigger,
    /// Win-stay, lose-switch.
    Pavlov,
    /// Coin flip every round.
    Random,
    /// Tit-for-Tat that forgives a defection one time in three.
    GenerousTitForTat,
}

impl StrategyBase {
    pub const ALL: [StrategyBase; 7] = [
        StrategyBase::TitForTat,
        StrategyBase::AlwaysDefect,
        StrategyBase::AlwaysCooperate,
        StrategyBase::GrimTrigger,
        StrategyBase::Pavlov,
        StrategyBase::Random,
        StrategyBase::GenerousTitForTat,
    ];

    pub fn probabilities(self) -> [f64; 4] {
        match self {
            StrategyBase::TitForTat => [1.0, 0.0, 1.0, 0.0],
            StrategyBase::AlwaysDefect => [0.0, 0.0, 0.0, 0.0],
            StrategyBase::AlwaysCooperate => [1.0, 1.0, 1.0, 1.0],
            StrategyBase::GrimTrigger => [1.0, 0.0, 0.0, 0.0],
            StrategyBase::Pavlov => [1.0, 0.0, 0.0, 1.0],
            StrategyBase::Random => [0.5, 0.5, 0.5, 0.5],
            StrategyBase::GenerousTitForTat => [1.0, 1.0 / 3.0, 1.0, 1.0 / 3.0],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StrategyBase::TitForTat => "Tit for Tat",
            StrategyBase::AlwaysDefect => "Always Defect",
            StrategyBase::AlwaysCooperate => "Always Cooperate",
            StrategyBase::GrimTrigger => "Grim Trigger",
            StrategyBase::Pavlov => "Pavlov",
            StrategyBase::Random => "Random",
            StrategyBase::GenerousTitForTat => "Generous Tit for Tat",
        }
    }

    /// Human-readable description (used by the WASM module)
    pub fn describe(self) -> &'static str {
        match self {
            StrategyBase::TitForTat => "Copies opponent's last move.",
            StrategyBase::AlwaysDefect => "Never cooperates. Always defects.",
            StrategyBase::AlwaysCooperate => "Never defects. Always cooperates.",
            StrategyBase::GrimTrigger => "Cooperates only while both players keep cooperating.",
            StrategyBase::Pavlov => "Repeats move if outcome was good, switches if bad.",
            StrategyBase::Random => "Randomly cooperates or defects each round.",
            StrategyBase::GenerousTitForTat => {
                "Like Tit for Tat, but forgives a defection one time in three."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_order_matches_index() {
        for (i, state) in JointState::ALL.iter().enumerate() {
            assert_eq!(state.index(), i);
        }
    }

    #[test]
    fn test_state_moves_round_trip() {
        for state in JointState::ALL {
            let (mine, theirs) = state.moves();
            assert_eq!(JointState::from_moves(mine, theirs), state);
        }
    }

    #[test]
    fn test_mirrored_swaps_roles() {
        assert_eq!(JointState::CooperateDefect.mirrored(), JointState::DefectCooperate);
        assert_eq!(JointState::DefectCooperate.mirrored(), JointState::CooperateDefect);
        assert_eq!(JointState::CooperateCooperate.mirrored(), JointState::CooperateCooperate);
        assert_eq!(JointState::DefectDefect.mirrored(), JointState::DefectDefect);
    }

    #[test]
    fn test_vector_rejects_out_of_range() {
        assert!(StrategyVector::new([0.5, 1.2, 0.0, 1.0]).is_none());
        assert!(StrategyVector::new([-0.1, 0.0, 0.0, 0.0]).is_none());
        assert!(StrategyVector::new([f64::NAN, 0.0, 0.0, 0.0]).is_none());
        assert!(StrategyVector::new([0.0, 1.0, 0.25, 0.75]).is_some());
    }

    #[test]
    fn test_cooperate_after() {
        let v = StrategyVector::new([0.9, 0.1, 0.8, 0.2]).unwrap();
        assert_eq!(v.cooperate_after(JointState::CooperateCooperate), 0.9);
        assert_eq!(v.cooperate_after(JointState::CooperateDefect), 0.1);
        assert_eq!(v.cooperate_after(JointState::DefectCooperate), 0.8);
        assert_eq!(v.cooperate_after(JointState::DefectDefect), 0.2);
    }

    #[test]
    fn test_generosity() {
        assert_eq!(StrategyVector::from(StrategyBase::AlwaysCooperate).generosity(), 1.0);
        assert_eq!(StrategyVector::from(StrategyBase::AlwaysDefect).generosity(), 0.0);
        assert_eq!(StrategyVector::from(StrategyBase::TitForTat).generosity(), 0.5);
    }

    #[test]
    fn test_tit_for_tat_signature_is_exact() {
        assert!(StrategyVector::from(StrategyBase::TitForTat).is_tit_for_tat());
        assert!(!StrategyVector::from(StrategyBase::GenerousTitForTat).is_tit_for_tat());
        let near = StrategyVector::new([1.0, 0.0, 0.999_999, 0.0]).unwrap();
        assert!(!near.is_tit_for_tat());
    }

    #[test]
    fn test_vector_deserialize_validates() {
        let ok: StrategyVector = serde_json::from_str("[1.0, 0.0, 1.0, 0.0]").unwrap();
        assert!(ok.is_tit_for_tat());
        assert!(serde_json::from_str::<StrategyVector>("[1.0, 2.0, 1.0, 0.0]").is_err());
    }

    #[test]
    fn test_all_bases_are_valid_vectors() {
        for base in StrategyBase::ALL {
            assert!(StrategyVector::new(base.probabilities()).is_some(), "{:?}", base);
            assert!(!base.describe().is_empty());
        }
    }
}
