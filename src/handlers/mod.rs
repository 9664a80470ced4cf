pub mod health_handler;
pub mod study_plan_handler;

pub use health_handler::health_check;
pub use study_plan_handler::generate_study_plan;
