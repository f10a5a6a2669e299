pub mod consolidator;
pub mod organizer;
pub mod processor;
pub mod timecalc;
