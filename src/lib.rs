pub mod assets;
pub mod audio;
pub mod buffs;
pub mod collision;
pub mod config;
pub mod effects;
pub mod entities;
pub mod game;
pub mod highscore;
pub mod input;
pub mod kinematics;
pub mod session;
pub mod spawner;
pub mod state;
pub mod story;
