pub mod connection;
pub mod job_repository;
pub mod migrations;
pub mod models;
pub mod type_repository;
pub mod update;
