pub(crate) mod macros;

pub mod application;
pub mod comment;
pub mod period;
pub mod person;
pub mod settings;
pub mod sick_note;
pub mod statistics;
pub mod working_time;

// Re-export all models for easy importing
pub use application::*;
pub use comment::*;
pub use period::*;
pub use person::*;
pub use settings::*;
pub use sick_note::*;
pub use statistics::*;
pub use working_time::*;
