pub mod check;
pub mod cycle;
pub mod reminder;
