pub mod markup;
pub mod time;
pub mod vtt;
