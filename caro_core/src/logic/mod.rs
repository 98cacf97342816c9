pub mod board;
pub mod eval_constants;
pub mod restriction;
pub mod rules;
