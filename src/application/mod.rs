/// Application layer: per-operation sync policy and the orchestration use case
pub mod services;
pub mod use_cases;
