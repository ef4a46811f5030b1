pub mod fileio;
pub mod wav;
