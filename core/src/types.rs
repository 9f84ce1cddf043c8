use alloc::string::String;
use serde::{Deserialize, Serialize};

/// Position of a card on the board, in dealing order.
pub type CardIndex = usize;

/// Identity of a card, stable for the lifetime of a board.
pub type CardId = u16;

/// Cards sharing a pair id match each other.
pub type PairId = u16;

/// Count type for moves, also the unit of the best score.
pub type MoveCount = u32;

/// Whole seconds, used for the preview countdown and elapsed time.
pub type Seconds = u32;

/// Opaque image reference, in practice a URL.
pub type ImageId = String;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub image: ImageId,
    pub is_flipped: bool,
    pub is_matched: bool,
    pub pair_id: PairId,
}

impl Card {
    pub fn face_down(id: CardId, pair_id: PairId, image: ImageId) -> Self {
        Self {
            id,
            image,
            is_flipped: false,
            is_matched: false,
            pair_id,
        }
    }

    pub const fn is_face_up(&self) -> bool {
        self.is_flipped || self.is_matched
    }

    /// Whether a click may turn this card over.
    pub const fn is_selectable(&self) -> bool {
        !self.is_face_up()
    }

    pub const fn matches(&self, other: &Card) -> bool {
        self.pair_id == other.pair_id
    }
}
