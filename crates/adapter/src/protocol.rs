//! Protocol module - JSON payloads exchanged with the move advisor
//!
//! One request line, one response line. Field names are camelCase on the wire.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{shape_matrix, Board, BoardSnapshot, ShapeMatrix};
use crate::types::{Cell, Rotation};

/// Board state sent to the advisor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorRequest {
    pub width: u16,
    pub height: u16,
    /// Rows top to bottom; 0 empty, 1..=7 color tags
    pub cells: Vec<Vec<Cell>>,
    /// Occupancy matrix of the active piece in its current rotation
    pub current_shape: Option<ShapeMatrix>,
    /// Occupancy matrix of the upcoming piece in rotation 0
    pub next_shape: Option<ShapeMatrix>,
}

impl AdvisorRequest {
    pub fn from_snapshot(snapshot: &BoardSnapshot) -> Self {
        Self {
            width: snapshot.width(),
            height: snapshot.height(),
            cells: snapshot.grid.to_rows(),
            current_shape: snapshot.active.map(|piece| *piece.matrix()),
            next_shape: Some(*shape_matrix(snapshot.next, Rotation::North)),
        }
    }

    pub fn from_board(board: &Board) -> Self {
        Self {
            width: board.width(),
            height: board.height(),
            cells: board.grid().to_rows(),
            current_shape: board.active().map(|piece| *piece.matrix()),
            next_shape: Some(*shape_matrix(board.next_kind(), Rotation::North)),
        }
    }
}

/// Advisor reply: target column and number of clockwise turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorMove {
    pub op_x: i32,
    pub op_rotate: i32,
}

impl AdvisorMove {
    /// Target rotation; turn counts wrap modulo 4, negatives included
    pub fn rotation(&self) -> Rotation {
        Rotation::from_index(self.op_rotate.rem_euclid(4) as usize)
    }
}

/// Serialize a request as one newline-terminated line
pub fn encode_request(request: &AdvisorRequest) -> anyhow::Result<String> {
    let mut line = serde_json::to_string(request).context("serialize advisor request")?;
    line.push('\n');
    Ok(line)
}

/// Parse one response line
pub fn parse_move(line: &str) -> anyhow::Result<AdvisorMove> {
    let line = line.trim();
    anyhow::ensure!(!line.is_empty(), "empty advisor response");
    serde_json::from_str(line).with_context(|| format!("malformed advisor response: {line}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    #[test]
    fn test_request_uses_camel_case_fields() {
        let mut board = Board::new(4, 4, 1);
        assert!(board.spawn());
        let line = encode_request(&AdvisorRequest::from_board(&board)).unwrap();
        assert!(line.ends_with('\n'));

        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["width"], 4);
        assert_eq!(value["height"], 4);
        assert_eq!(value["cells"].as_array().unwrap().len(), 4);
        assert_eq!(value["currentShape"].as_array().unwrap().len(), 4);
        assert!(value["nextShape"].is_array());
    }

    #[test]
    fn test_missing_piece_serializes_as_null() {
        let board = Board::new(10, 20, 1);
        let request = AdvisorRequest::from_board(&board);
        let value = serde_json::to_value(&request).unwrap();
        assert!(value["currentShape"].is_null());
    }

    #[test]
    fn test_snapshot_and_board_agree() {
        let mut board = Board::new(10, 20, 3);
        assert!(board.spawn());
        assert_eq!(
            AdvisorRequest::from_board(&board),
            AdvisorRequest::from_snapshot(&board.snapshot())
        );
    }

    #[test]
    fn test_parse_move() {
        let mv = parse_move(r#"{"opX":4,"opRotate":1}"#).unwrap();
        assert_eq!(mv, AdvisorMove { op_x: 4, op_rotate: 1 });
        assert_eq!(mv.rotation(), Rotation::East);
    }

    #[test]
    fn test_rotation_wraps() {
        let mv = AdvisorMove { op_x: 0, op_rotate: 6 };
        assert_eq!(mv.rotation(), Rotation::South);
        let mv = AdvisorMove { op_x: 0, op_rotate: -1 };
        assert_eq!(mv.rotation(), Rotation::West);
    }

    #[test]
    fn test_malformed_responses_are_errors() {
        assert!(parse_move("").is_err());
        assert!(parse_move("   \n").is_err());
        assert!(parse_move("not json").is_err());
        assert!(parse_move(r#"{"opX":"left"}"#).is_err());
    }

    #[test]
    fn test_next_shape_matches_catalog() {
        let board = Board::new(10, 20, 8);
        let request = AdvisorRequest::from_board(&board);
        let kind = board.next_kind();
        assert_eq!(request.next_shape, Some(*shape_matrix(kind, Rotation::North)));
        assert!(PieceKind::ALL.contains(&kind));
    }
}
