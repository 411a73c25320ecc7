//! Unit tests for individual components

mod api_test;
mod builders_test;
mod config_test;
mod error_test;
mod journal_test;
mod semaphore_test;
mod util_test;
