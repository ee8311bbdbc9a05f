pub mod codelist;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod queries;
pub mod query_builder;
pub mod stats;
