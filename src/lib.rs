#[macro_use]
extern crate diesel;
extern crate glob;
extern crate regex;
extern crate serde;
extern crate serde_json;
#[cfg(test)]
extern crate tempfile;
extern crate tracing;

pub mod bids;
pub mod config;
pub mod index;
pub mod matcher;
pub mod qc_db;
pub mod qc_spec;
pub mod service;
pub mod table;
