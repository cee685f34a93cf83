pub mod config;
pub mod leads;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod sources;
