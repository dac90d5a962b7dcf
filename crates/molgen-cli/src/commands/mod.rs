pub mod catalog;
pub mod data;
pub mod generate;
