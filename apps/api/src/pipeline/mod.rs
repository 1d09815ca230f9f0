// Application board: stage columns and card moves.

pub mod board;
pub mod handlers;
