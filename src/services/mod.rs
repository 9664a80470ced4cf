pub mod content_fetcher;
pub mod html_text;
pub mod link_enricher;
pub mod plan_generator;
pub mod plan_orchestrator;
pub mod plan_parser;
pub mod quiz_generator;

pub use plan_orchestrator::PlanOrchestrator;
pub use plan_parser::PlanOutcome;
