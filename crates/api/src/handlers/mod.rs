pub mod batch;
pub mod calendar;
pub mod content;
pub mod lifecycle;
pub mod rules;
pub mod themes;
