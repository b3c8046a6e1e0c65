pub mod config;
pub mod logging;

pub mod downloader;
pub mod inventory;
pub mod period;
pub mod pipeline;
pub mod probe;
pub mod url_model;
