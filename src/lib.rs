pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod grid;
pub mod input;
pub mod piece;
pub mod scheduler;
pub mod viewport;
