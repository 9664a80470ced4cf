pub mod dto;
pub mod plan;

pub use plan::{
    Chapter, EnrichedChapter, EnrichedStudyPlan, KnowledgeBase, PlanFailure, PlanRequest,
    PlanResult, PlanSuccess, Quiz, StudyPlan, SubtopicLinks,
};
