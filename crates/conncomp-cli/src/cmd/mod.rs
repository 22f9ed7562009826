pub mod gather;
pub mod split;
pub mod stats;
