//! Progress display for running tools

pub mod reporter;
