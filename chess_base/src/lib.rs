//! # Base types for chesslab
//!
//! This is an auxiliary crate for `chesslab` which contains the plain value types: squares,
//! colors, pieces and castling rights. Everything here is `Copy` and knows nothing about
//! the rules of the game.
//!
//! Normally you don't want to use this crate directly. Use `chesslab` instead.

pub mod geometry;
pub mod types;
