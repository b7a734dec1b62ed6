//! Client-side concerns shared by every operation: form validation, error
//! reporting, display formatting and the loading indicator.

pub mod errors;
pub mod forms;
pub mod loading;
pub mod utils;
