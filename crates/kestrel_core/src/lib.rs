pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod error;
pub mod magic;
pub mod movegen;
pub mod perft;
pub mod time_control;
pub mod types;
pub mod uci;
pub mod zobrist;

// Re-export the board layer used by the engine and adapter
pub use attacks::*;
pub use bitboard::*;
pub use board::*;
pub use error::{FenError, MoveTextError};
pub use movegen::*;
pub use perft::{perft, perft_divide};
pub use time_control::*;
pub use types::*;
pub use uci::*;
pub use zobrist::ZOBRIST;
