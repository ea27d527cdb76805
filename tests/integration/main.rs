//! Integration tests: the full router against the memory store, plus the
//! PostgreSQL store when `DATABASE_URL` is set.

mod access_log_test;
mod helpers;
mod postgres_test;
mod share_test;
