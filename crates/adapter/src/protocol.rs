//! Protocol module - wire schema of the shared match record
//!
//! One JSON document per match:
//! `{player1, player2, status, winner, createdAt, startedAt}`.
//! Boards travel as the 64-character encoding of [`Board::encode`]; trays travel as
//! `{instanceId, shapeId}` pairs and the cell matrix is looked up from the catalog on decode.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::{
    Attack, AttackKind, Board, BoardDecodeError, FieldUpdate, MatchState, Piece, PieceId,
    PlayerState, Tray, UpdateSet,
};
use crate::types::{MatchStatus, ParticipantId, ShapeId, TRAY_SIZE};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("bad board: {0}")]
    Board(#[from] BoardDecodeError),
    #[error("unknown shape id {0:?}")]
    UnknownShape(String),
    #[error("bad piece instance id {0:?}")]
    BadInstanceId(String),
    #[error("tray has {0} slots, expected 3")]
    TraySize(usize),
    #[error("unknown match status {0:?}")]
    UnknownStatus(String),
    #[error("unknown attack type {0:?}")]
    UnknownAttack(String),
    #[error("malformed match record: {0}")]
    Json(#[from] serde_json::Error),
}

// ============== DTOs ==============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceDto {
    pub instance_id: String,
    pub shape_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackDto {
    #[serde(rename = "type")]
    pub kind: String,
    pub duration: u64,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStateDto {
    #[serde(default)]
    pub uid: Option<String>,
    pub board: String,
    pub pieces: Vec<Option<PieceDto>>,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub incoming_attack: Option<AttackDto>,
    #[serde(default)]
    pub locked_until: u64,
    #[serde(default)]
    pub last_seen: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub player1: PlayerStateDto,
    pub player2: PlayerStateDto,
    pub status: String,
    #[serde(default)]
    pub winner: Option<String>,
    pub created_at: u64,
    #[serde(default)]
    pub started_at: Option<u64>,
}

// ============== Core -> wire ==============

impl From<&Piece> for PieceDto {
    fn from(piece: &Piece) -> Self {
        Self {
            instance_id: piece.id.to_string(),
            shape_id: piece.shape_id.as_str().to_string(),
        }
    }
}

impl From<&Attack> for AttackDto {
    fn from(attack: &Attack) -> Self {
        Self {
            kind: attack.kind.as_str().to_string(),
            duration: attack.duration_ms,
            timestamp: attack.timestamp,
        }
    }
}

pub fn tray_to_dto(tray: &Tray) -> Vec<Option<PieceDto>> {
    tray.slots()
        .iter()
        .map(|slot| slot.as_ref().map(PieceDto::from))
        .collect()
}

impl From<&PlayerState> for PlayerStateDto {
    fn from(player: &PlayerState) -> Self {
        Self {
            uid: player.participant.as_ref().map(|p| p.as_str().to_string()),
            board: player.board.encode(),
            pieces: tray_to_dto(&player.tray),
            score: player.score,
            incoming_attack: player.incoming_attack.as_ref().map(AttackDto::from),
            locked_until: player.locked_until,
            last_seen: player.last_seen,
        }
    }
}

impl From<&MatchState> for MatchRecord {
    fn from(state: &MatchState) -> Self {
        Self {
            player1: PlayerStateDto::from(&state.player1),
            player2: PlayerStateDto::from(&state.player2),
            status: state.status.as_str().to_string(),
            winner: state.winner.as_ref().map(|w| w.as_str().to_string()),
            created_at: state.created_at,
            started_at: state.started_at,
        }
    }
}

// ============== Wire -> core ==============

impl PieceDto {
    /// Rehydrate the piece; the cell matrix comes from the catalog
    pub fn to_piece(&self) -> Result<Piece, DecodeError> {
        let shape_id = ShapeId::from_str(&self.shape_id)
            .ok_or_else(|| DecodeError::UnknownShape(self.shape_id.clone()))?;
        let id = PieceId::parse(&self.instance_id)
            .ok_or_else(|| DecodeError::BadInstanceId(self.instance_id.clone()))?;
        Ok(Piece::new(id, shape_id))
    }
}

impl AttackDto {
    pub fn to_attack(&self) -> Result<Attack, DecodeError> {
        let kind = AttackKind::from_str(&self.kind)
            .ok_or_else(|| DecodeError::UnknownAttack(self.kind.clone()))?;
        Ok(Attack {
            kind,
            duration_ms: self.duration,
            timestamp: self.timestamp,
        })
    }
}

pub fn tray_from_dto(pieces: &[Option<PieceDto>]) -> Result<Tray, DecodeError> {
    if pieces.len() != TRAY_SIZE {
        return Err(DecodeError::TraySize(pieces.len()));
    }
    let mut slots = [None; TRAY_SIZE];
    for (slot, dto) in slots.iter_mut().zip(pieces) {
        *slot = dto.as_ref().map(PieceDto::to_piece).transpose()?;
    }
    Ok(Tray::from_slots(slots))
}

impl PlayerStateDto {
    pub fn to_player(&self) -> Result<PlayerState, DecodeError> {
        Ok(PlayerState {
            participant: self.uid.as_deref().map(ParticipantId::new),
            board: Board::decode(&self.board)?,
            tray: tray_from_dto(&self.pieces)?,
            score: self.score,
            incoming_attack: self
                .incoming_attack
                .as_ref()
                .map(AttackDto::to_attack)
                .transpose()?,
            locked_until: self.locked_until,
            last_seen: self.last_seen,
        })
    }
}

impl MatchRecord {
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn to_state(&self) -> Result<MatchState, DecodeError> {
        let status = MatchStatus::from_str(&self.status)
            .ok_or_else(|| DecodeError::UnknownStatus(self.status.clone()))?;
        Ok(MatchState {
            player1: self.player1.to_player()?,
            player2: self.player2.to_player()?,
            status,
            winner: self.winner.as_deref().map(ParticipantId::new),
            created_at: self.created_at,
            started_at: self.started_at,
        })
    }
}

/// Decode a pushed document straight into match state
pub fn decode_snapshot(value: Value) -> Result<MatchState, DecodeError> {
    MatchRecord::from_value(value)?.to_state()
}

// ============== Partial updates ==============

fn field_value(field: &FieldUpdate) -> Result<Value, serde_json::Error> {
    let value = match field {
        FieldUpdate::Participant(_, id) | FieldUpdate::Winner(id) => match id {
            Some(id) => Value::from(id.as_str()),
            None => Value::Null,
        },
        FieldUpdate::Board(_, board) => Value::from(board.encode()),
        FieldUpdate::Pieces(_, tray) => serde_json::to_value(tray_to_dto(tray))?,
        FieldUpdate::Score(_, score) => Value::from(*score),
        FieldUpdate::IncomingAttack(_, attack) => {
            serde_json::to_value(attack.as_ref().map(AttackDto::from))?
        }
        FieldUpdate::LockedUntil(_, t) | FieldUpdate::LastSeen(_, t) | FieldUpdate::StartedAt(t) => {
            Value::from(*t)
        }
        FieldUpdate::Status(status) => Value::from(status.as_str()),
    };
    Ok(value)
}

/// Dotted-path map for a partial write, e.g. `{"player1.score": 24, "status": "finished"}`
pub fn update_to_fields(update: &UpdateSet) -> Result<Map<String, Value>, serde_json::Error> {
    let mut fields = Map::new();
    for field in update.fields() {
        fields.insert(field.path().to_dotted(), field_value(field)?);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PieceGenerator;
    use crate::types::{Millis, PlayerSlot};
    use serde_json::json;

    fn sample(now: Millis) -> MatchState {
        let mut gen = PieceGenerator::new(5);
        let mut state = MatchState::new_waiting(ParticipantId::new("host"), &mut gen, now);
        state.player1.board = Board::from_rows(&["##......", "#......."]);
        state.player1.tray.take(1);
        state.player2.incoming_attack = Some(Attack {
            kind: AttackKind::Lock,
            duration_ms: 7_000,
            timestamp: now,
        });
        state
    }

    #[test]
    fn test_record_field_names() {
        let value = MatchRecord::from(&sample(42)).to_value().unwrap();

        assert_eq!(value["status"], json!("waiting"));
        assert_eq!(value["createdAt"], json!(42));
        assert_eq!(value["player1"]["uid"], json!("host"));
        assert!(value["player1"]["board"].as_str().unwrap().starts_with("11000000100"));
        assert!(value["player1"]["pieces"][1].is_null());
        assert!(value["player1"]["pieces"][0]["shapeId"].is_string());
        assert!(value["player1"]["pieces"][0].get("cells").is_none());
        assert_eq!(value["player2"]["incomingAttack"]["type"], json!("lock"));
        assert_eq!(value["player2"]["uid"], Value::Null);
    }

    #[test]
    fn test_snapshot_rehydrates_state() {
        let state = sample(42);
        let value = MatchRecord::from(&state).to_value().unwrap();
        assert_eq!(decode_snapshot(value).unwrap(), state);
    }

    #[test]
    fn test_unknown_shape_is_rejected() {
        let mut value = MatchRecord::from(&sample(1)).to_value().unwrap();
        value["player2"]["pieces"][0]["shapeId"] = json!("pentomino");
        assert!(matches!(
            decode_snapshot(value),
            Err(DecodeError::UnknownShape(id)) if id == "pentomino"
        ));
    }

    #[test]
    fn test_bad_board_is_rejected() {
        let mut value = MatchRecord::from(&sample(1)).to_value().unwrap();
        value["player1"]["board"] = json!("0101");
        assert!(matches!(decode_snapshot(value), Err(DecodeError::Board(_))));
    }

    #[test]
    fn test_update_fields_use_dotted_paths() {
        let update = UpdateSet::new()
            .require_status(MatchStatus::Playing)
            .with(FieldUpdate::Score(PlayerSlot::Player1, 24))
            .with(FieldUpdate::IncomingAttack(PlayerSlot::Player2, None))
            .with(FieldUpdate::Status(MatchStatus::Finished))
            .with(FieldUpdate::Winner(Some(ParticipantId::new("host"))));

        let fields = update_to_fields(&update).unwrap();
        assert_eq!(fields["player1.score"], json!(24));
        assert_eq!(fields["player2.incomingAttack"], Value::Null);
        assert_eq!(fields["status"], json!("finished"));
        assert_eq!(fields["winner"], json!("host"));
        assert_eq!(fields.len(), 4);
    }
}
