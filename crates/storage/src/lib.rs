pub mod import;
pub mod remote;
pub mod repository;
pub mod sqlite;
