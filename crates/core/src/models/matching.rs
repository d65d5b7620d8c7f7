use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A prepaid package of PT sessions between one trainer and one member.
/// Created and completed by the external matching workflow; this engine only
/// ever decrements `remaining_sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matching {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub member_id: Uuid,
    pub total_sessions: i32,
    pub remaining_sessions: i32,
    pub complete: bool,
}
