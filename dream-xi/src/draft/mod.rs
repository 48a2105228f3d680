pub mod controller;
pub mod player;
pub mod pool;
pub mod roster;
