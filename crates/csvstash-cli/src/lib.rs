//! Library components of the csvstash command line tool.

pub mod logging;
pub mod pipeline;
