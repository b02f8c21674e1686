pub mod assets;
pub mod audio;
pub mod canvas;
pub mod clock;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod game;
pub mod score_store;
