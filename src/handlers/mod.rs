pub mod basedata;
pub mod comments;
pub mod health;
pub mod settings;
pub mod shared;
pub mod sick_notes;
pub mod statistics;
pub mod working_time;
