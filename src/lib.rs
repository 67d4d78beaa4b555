pub mod cli;
pub mod config;
pub mod inject;
pub mod logging;
pub mod repolist;
pub mod xml;
