pub mod app;
pub mod catalogue;
pub mod cli;
pub mod config;
pub mod fetcher;
pub mod output;
pub mod parser;
pub mod runner;

#[cfg(test)]
mod tests;
