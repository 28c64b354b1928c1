pub mod flow;
pub mod gate;
pub mod reward;
pub mod survey;
