pub mod config;
pub mod db;
pub mod page;
pub mod parser;
pub mod snapshot;
pub mod theme;
