//! Persistence adapters implementing [`quizbyte_core::Store`].

pub mod postgres;

pub use postgres::PostgresStore;
