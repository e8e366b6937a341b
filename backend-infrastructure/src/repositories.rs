pub mod rest_repository;

pub use rest_repository::*;
