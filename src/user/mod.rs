pub mod handlers;
#[cfg(any(test, not(feature = "mysql")))]
pub mod memory_repository;
pub mod models;
#[cfg(feature = "mysql")]
pub mod mysql_repository;
pub mod repository;
