pub mod aggregator;
pub mod matcher;
pub mod service;
pub mod types;

pub use aggregator::{aggregate, ActiveSet, Aggregation};
pub use matcher::{MatchError, RuleMatcher};
pub use service::{GenerateOptions, GenerationService, ServiceError};
pub use types::{Param, RepoSnapshot, Rule, Task, Workspace};
