pub mod runner;

pub use runner::{Delivery, Runner};
