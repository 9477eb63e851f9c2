pub mod deal;
pub mod property;
