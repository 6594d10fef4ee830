pub mod links;

pub use links::{LinkInfo, find_links};
