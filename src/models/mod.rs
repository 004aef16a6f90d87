pub mod daily;
pub mod equity;
