pub mod events;
pub mod similarity;
