//! Kunai event storage - integration test support.
//!
//! This crate re-exports the workspace crates so that integration tests can
//! use `kunai_test::` paths.

pub mod component {
    pub use kunai_core::*;

    pub mod db {
        pub use kunai_db::db::*;
        pub use kunai_db::error::{DbError, DbResult, StorageError};
    }
}

pub mod app {
    pub use kunai_app::*;
}

pub use kunai_rfc as rfc;
