//! Wire messages on `/ws`.
//!
//! Inbound frames are tagged JSON (`{"type": "play", "hand_id": 3, "card": "QC"}`).
//! Outbound frames are either a `ServerMsg` or an `OutboundEvent` from the
//! services, both tagged by `type`.

use serde::{Deserialize, Serialize};

use crate::domain::{Card, HandId, HouseId, UserId};
use crate::errors::ErrorCode;

pub const PROTOCOL_VERSION: i32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Hello {
        protocol: i32,
    },
    JoinHouse {
        house_id: HouseId,
        #[serde(default)]
        seat: Option<usize>,
    },
    LeaveHouse {
        house_id: HouseId,
    },
    StartHand {
        house_id: HouseId,
    },
    PickOrPass {
        hand_id: HandId,
        pick: bool,
    },
    Bury {
        hand_id: HandId,
        cards: Vec<Card>,
    },
    Call {
        hand_id: HandId,
        card: Card,
    },
    Play {
        hand_id: HandId,
        card: Card,
    },
}

impl ClientMsg {
    pub fn name(&self) -> &'static str {
        match self {
            ClientMsg::Hello { .. } => "hello",
            ClientMsg::JoinHouse { .. } => "join_house",
            ClientMsg::LeaveHouse { .. } => "leave_house",
            ClientMsg::StartHand { .. } => "start_hand",
            ClientMsg::PickOrPass { .. } => "pick_or_pass",
            ClientMsg::Bury { .. } => "bury",
            ClientMsg::Call { .. } => "call",
            ClientMsg::Play { .. } => "play",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    HelloAck { protocol: i32, user_id: UserId },
    /// An action was accepted and persisted.
    Ack { action: String },
    /// Sent to the originating connection only.
    Error { code: ErrorCode, message: String },
}
