pub mod csv;
pub mod logger;
pub mod time;
pub mod validation;
