//! SQLite persistence for documents and their chunk vectors

mod database;

pub use database::DocumentDb;
