pub mod fetch;
pub mod ingest;
pub mod orbit;
pub mod parse;
pub mod schedule;
pub mod sink;
