//! LLM client for lesson-plan generation.

mod ai_types;
mod client;
mod error;
mod lesson_plan;

pub use client::{LlmClient, DEFAULT_MODEL};
pub use error::LlmError;
pub use lesson_plan::{
    build_lesson_plan_prompt, parse_lesson_plan, LessonPlan, LessonPlanRequest, LessonPlanSection,
};
