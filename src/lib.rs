pub mod parser;
pub mod aggregate;
pub mod similarity;
pub mod grouping;
pub mod config;
pub mod summary;
pub mod export;
pub mod report;
pub mod pipeline;

pub use config::{PipelineConfig, SimilarityThreshold, SortOrder};
pub use grouping::Grouping;
pub use similarity::similarity;
