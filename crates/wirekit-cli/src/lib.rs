pub mod config;
pub mod form_spec;
pub mod logging;
pub mod output;
pub mod paths;
