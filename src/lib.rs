pub mod agent;
pub mod config;
pub mod daily;
pub mod format;
pub mod git;
pub mod model;
pub mod prompt;
pub mod storage;
