// Adapters layer: concrete file access, roster JSON and output sheets.

pub mod output;
pub mod roster;
pub mod storage;
