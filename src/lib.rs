#![warn(clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::uninlined_format_args,
    clippy::missing_errors_doc
)]

pub mod app;
pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod info;
pub mod list;
pub mod report;
