pub mod perception;
pub mod presentation;
