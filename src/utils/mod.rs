pub mod duration;
pub mod embed;
