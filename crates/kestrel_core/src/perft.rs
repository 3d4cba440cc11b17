//! Move-path enumeration for validating the generator and make/undo.

use crate::{board::Board, movegen::legal_moves_into, types::Move};

/// Counts the leaf nodes of the legal move tree below the current position.
///
/// The board is restored before returning.
pub fn perft(board: &mut Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut layers = vec![Vec::with_capacity(64); depth as usize];
    count(board, depth, &mut layers[..])
}

/// Per-root-move leaf counts, in generation order.
pub fn perft_divide(board: &mut Board, depth: u8) -> Vec<(Move, u64)> {
    let mut roots = Vec::with_capacity(64);
    legal_moves_into(board, &mut roots);
    if depth == 0 {
        return Vec::new();
    }

    let mut layers = vec![Vec::with_capacity(64); depth as usize - 1];
    roots
        .into_iter()
        .map(|mv| {
            board.make_move(mv);
            let nodes = count(board, depth - 1, &mut layers[..]);
            board.undo_move();
            (mv, nodes)
        })
        .collect()
}

fn count(board: &mut Board, depth: u8, layers: &mut [Vec<Move>]) -> u64 {
    if depth == 0 {
        return 1;
    }

    let (buf, rest) = layers
        .split_first_mut()
        .expect("perft requires one buffer per remaining ply");
    legal_moves_into(board, buf);

    // Legal generation means the leaves are the moves themselves.
    if depth == 1 {
        return buf.len() as u64;
    }

    let mut nodes = 0u64;
    for mv in buf.iter().copied() {
        board.make_move(mv);
        nodes += count(board, depth - 1, rest);
        board.undo_move();
    }
    nodes
}

#[cfg(test)]
#[path = "perft_tests.rs"]
mod perft_tests;
