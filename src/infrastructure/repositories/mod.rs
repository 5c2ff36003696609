//! Repository implementations using SeaORM

pub mod record_repository;

pub use record_repository::SeaOrmRepository;
