pub mod ai;
pub mod automated;
pub mod manual;
pub mod practice;
