pub mod batch;
pub mod datasets;
pub mod fetch;
pub mod gz;
pub mod metric;
pub mod output;
pub mod report;
