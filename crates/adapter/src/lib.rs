//! Adapter module - external move advisor over TCP with a JSON protocol
//!
//! A session in external mode does not search for moves itself. It sends the
//! board to an advisor service and plays out the column/rotation it gets back.
//!
//! # Protocol Overview
//!
//! Each exchange is a fresh TCP connection carrying **one line of JSON** each
//! way:
//!
//! ```text
//! Game -> Advisor: {"width":10,"height":20,"cells":[[0,..],..],"currentShape":[[0,1,0,0],..],"nextShape":[[..],..]}
//! Advisor -> Game: {"opX":3,"opRotate":1}
//! ```
//!
//! - `cells` are rows top to bottom, 0 for empty and 1..=7 for color tags
//! - `currentShape` is the active piece's 4x4 matrix in its current rotation,
//!   `null` when there is no active piece
//! - `opRotate` is a count of clockwise turns and wraps modulo 4
//!
//! # Availability
//!
//! A connection failure, a timeout and a malformed reply all mean the same
//! thing: the advisor is unavailable. The game freezes until an exchange
//! succeeds again. While unavailable, attempts are spaced by a retry delay.
//!
//! # Environment Variables
//!
//! - `TETRIS_ADVISOR_HOST`: advisor host (default: "localhost")
//! - `TETRIS_ADVISOR_PORT`: advisor port (default: 3000)
//! - `TETRIS_ADVISOR_DISABLED`: set to "1" or "true" to skip creating a client
//!
//! # Testing
//!
//! A one-line advisor for manual testing:
//!
//! ```bash
//! while true; do echo '{"opX":0,"opRotate":1}' | nc -l 3000; done
//! ```

pub mod client;
pub mod protocol;

pub use tetris_ai_core as core;
pub use tetris_ai_types as types;

pub use client::{exchange, AdvisorConfig, MoveAdvisor, TcpAdvisor};
pub use protocol::{encode_request, parse_move, AdvisorMove, AdvisorRequest};
