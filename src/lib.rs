// Library for tests to access modules

pub mod apm_repo;
pub mod config;
pub mod discovery;
pub mod error;
pub mod hec_sink;
pub mod models;
pub mod normalize;
pub mod version;
pub mod worker;
