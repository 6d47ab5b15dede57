//! Lesson-plan generation: prompt, request and lenient parsing of the reply.

use onyx_ext_core::QualityTier;
use serde::{Deserialize, Serialize};

use crate::client::{clip, LlmClient};
use crate::error::LlmError;

const MAX_SECTIONS: usize = 20;
const MAX_SECTION_MINUTES: u32 = 600;
const MAX_INSTRUCTIONS_LEN: usize = 2000;
const SYSTEM_PROMPT: &str = "You are an instructional designer. Reply with JSON only.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonPlanRequest {
    pub topic: String,
    #[serde(default)]
    pub audience: Option<String>,
    /// Target total duration; the model is told to respect it.
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub quality_tier: Option<String>,
    #[serde(default)]
    pub folder_id: Option<i64>,
    #[serde(default)]
    pub instructions: Option<String>,
}

fn default_language() -> String {
    "English".to_owned()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LessonPlanSection {
    pub title: String,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LessonPlan {
    pub title: String,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub sections: Vec<LessonPlanSection>,
    #[serde(default)]
    pub assessment: Option<String>,
}

impl LessonPlan {
    #[must_use]
    pub fn total_minutes(&self) -> u32 {
        self.sections.iter().map(|s| s.duration_minutes).sum()
    }
}

fn tier_guidance(tier: QualityTier) -> &'static str {
    match tier {
        QualityTier::Basic => "Keep it lecture-based with few activities.",
        QualityTier::Interactive => "Include a hands-on activity or discussion in most sections.",
        QualityTier::Advanced => {
            "Include varied activities, a case study and formative checks in every section."
        },
        QualityTier::Immersive => {
            "Design scenario-based activities, simulations and role play across the whole lesson."
        },
    }
}

#[must_use]
pub fn build_lesson_plan_prompt(request: &LessonPlanRequest) -> String {
    let tier = request.quality_tier.as_deref().map_or_else(QualityTier::default, QualityTier::normalize);
    let audience = request.audience.as_deref().unwrap_or("general adult learners");
    let duration = request
        .duration_minutes
        .map_or_else(|| "a duration you judge appropriate".to_owned(), |m| format!("{m} minutes in total"));
    let extra = request
        .instructions
        .as_deref()
        .map(|i| format!("\nAdditional instructions: {}", clip(i.trim(), MAX_INSTRUCTIONS_LEN)))
        .unwrap_or_default();

    format!(
        r#"Create a lesson plan.

Topic: {topic}
Audience: {audience}
Duration: {duration}
Language: {language}
Quality tier: {tier_label}. {guidance}{extra}

Return JSON with these fields:
- title: lesson title
- objectives: array of 3-5 measurable learning objectives
- materials: array of required materials
- sections: array of {{"title", "duration_minutes" (integer), "activities" (array of strings), "notes"}}
- assessment: how learning is checked"#,
        topic = request.topic.trim(),
        language = request.language,
        tier_label = tier.label(),
        guidance = tier_guidance(tier),
    )
}

/// Strip a markdown code fence around a JSON reply.
pub(crate) fn strip_markdown_json(content: &str) -> &str {
    let trimmed = content.trim();
    let inner = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"));
    inner.map_or(trimmed, str::trim)
}

/// Parse a model reply into a plan. Blank sections are dropped and
/// durations are clamped.
///
/// # Errors
/// `MalformedReply` for non-JSON replies, `InvalidPlan` when no title or no
/// usable section remains.
pub fn parse_lesson_plan(content: &str) -> Result<LessonPlan, LlmError> {
    let json = strip_markdown_json(content);
    let mut plan: LessonPlan = serde_json::from_str(json).map_err(|e| LlmError::MalformedReply {
        context: format!("lesson plan (content: {})", clip(json, 300)),
        source: e,
    })?;

    plan.title = plan.title.trim().to_owned();
    if plan.title.is_empty() {
        return Err(LlmError::InvalidPlan("missing title".to_owned()));
    }
    plan.objectives.retain(|o| !o.trim().is_empty());
    plan.materials.retain(|m| !m.trim().is_empty());
    plan.sections.retain(|s| !s.title.trim().is_empty());
    plan.sections.truncate(MAX_SECTIONS);
    for section in &mut plan.sections {
        section.duration_minutes = section.duration_minutes.min(MAX_SECTION_MINUTES);
        section.activities.retain(|a| !a.trim().is_empty());
    }
    if plan.sections.is_empty() {
        return Err(LlmError::InvalidPlan("no sections".to_owned()));
    }
    Ok(plan)
}

impl LlmClient {
    /// Generate a lesson plan for `request`.
    ///
    /// # Errors
    /// Any `LlmError` from the API call or from parsing the reply.
    pub async fn generate_lesson_plan(
        &self,
        request: &LessonPlanRequest,
    ) -> Result<LessonPlan, LlmError> {
        let content =
            self.complete_json(SYSTEM_PROMPT, &build_lesson_plan_prompt(request)).await?;
        let plan = parse_lesson_plan(&content)?;
        tracing::info!(
            title = %plan.title,
            sections = plan.sections.len(),
            minutes = plan.total_minutes(),
            "lesson plan generated"
        );
        Ok(plan)
    }
}
