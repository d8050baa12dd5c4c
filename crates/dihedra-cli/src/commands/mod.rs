pub mod check;
pub mod identify;
