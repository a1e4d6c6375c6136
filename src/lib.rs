//! A small task tracker: a REST backend over a document store and a
//! terminal client that lists, filters, and edits the tasks it serves.

pub mod api;
pub mod app;
pub mod config;
pub mod form;
pub mod logging;
pub mod models;
pub mod parser;
pub mod server;
pub mod ui;
pub mod view;
