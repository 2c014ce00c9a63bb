//! Webcam fingertip-controlled dodging game.
//!
//! The index fingertip of one detected hand steers a paddle along the
//! bottom of the game window while a block falls from the top. Dodging the
//! block scores a point; touching it ends the round until the restart
//! button is clicked.

#[cfg(feature = "desktop")]
pub mod camera;
pub mod clock;
pub mod config;
pub mod game;
pub mod hand;
pub mod render;
pub mod tracker;
