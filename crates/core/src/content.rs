//! Lenient views over `microproduct_content` JSON.
//!
//! Content is written by editors and AI regenerators, so every field is
//! optional and may carry the wrong JSON type. Parsing never fails: a
//! malformed tree yields fewer lessons, not an error.

use serde::Serialize;
use serde_json::Value;

use crate::completion_time::{completion_minutes_from_value, hours_value_to_minutes};

/// One lesson as seen by the hours rollup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LessonEntry {
    pub title: String,
    /// Explicit learning duration (`hours`), in minutes.
    pub hours_minutes: Option<u32>,
    /// Parsed `completionTime`, in minutes.
    pub completion_minutes: Option<u32>,
    pub quality_tier: Option<String>,
}

impl LessonEntry {
    /// Minutes used for creation-effort estimates.
    #[must_use]
    pub fn effective_completion_minutes(&self) -> u32 {
        self.completion_minutes.or(self.hours_minutes).unwrap_or(0)
    }

    /// Minutes counted as learner-facing duration.
    #[must_use]
    pub fn learning_minutes(&self) -> u32 {
        self.hours_minutes.unwrap_or_else(|| self.effective_completion_minutes())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionEntry {
    pub title: String,
    pub quality_tier: Option<String>,
    pub lessons: Vec<LessonEntry>,
}

/// Section/lesson tree extracted from a project's content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentTree {
    pub sections: Vec<SectionEntry>,
}

impl ContentTree {
    #[must_use]
    pub fn from_value(content: &Value) -> Self {
        let sections = content
            .get("sections")
            .and_then(Value::as_array)
            .map(|sections| sections.iter().filter_map(parse_section).collect())
            .unwrap_or_default();
        Self { sections }
    }

    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.sections.iter().map(|s| s.lessons.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lesson_count() == 0
    }
}

fn text_field(obj: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_str))
        .map(str::to_owned)
}

fn tier_field(obj: &Value) -> Option<String> {
    text_field(obj, &["quality_tier", "qualityTier"])
}

fn parse_section(section: &Value) -> Option<SectionEntry> {
    if !section.is_object() {
        return None;
    }
    let lessons = section
        .get("lessons")
        .and_then(Value::as_array)
        .map(|lessons| lessons.iter().filter_map(parse_lesson).collect())
        .unwrap_or_default();
    Some(SectionEntry {
        title: text_field(section, &["title", "name"]).unwrap_or_default(),
        quality_tier: tier_field(section),
        lessons,
    })
}

fn parse_lesson(lesson: &Value) -> Option<LessonEntry> {
    if let Some(title) = lesson.as_str() {
        return Some(LessonEntry { title: title.to_owned(), ..LessonEntry::default() });
    }
    if !lesson.is_object() {
        return None;
    }
    Some(LessonEntry {
        title: text_field(lesson, &["title", "name"]).unwrap_or_default(),
        hours_minutes: lesson.get("hours").and_then(hours_value_to_minutes),
        completion_minutes: ["completionTime", "completion_time"]
            .iter()
            .find_map(|k| lesson.get(*k))
            .and_then(completion_minutes_from_value),
        quality_tier: tier_field(lesson),
    })
}

/// One slide of a presentation deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Slide {
    pub title: String,
    pub bullets: Vec<String>,
    pub text: Option<String>,
    pub notes: Option<String>,
}

/// Extract slides from presentation content (`{"slides": [...]}`).
#[must_use]
pub fn parse_slides(content: &Value) -> Vec<Slide> {
    content
        .get("slides")
        .and_then(Value::as_array)
        .map(|slides| {
            slides
                .iter()
                .filter(|s| s.is_object())
                .map(|s| Slide {
                    title: text_field(s, &["slideTitle", "title"]).unwrap_or_default(),
                    bullets: s
                        .get("bullets")
                        .and_then(Value::as_array)
                        .map(|b| b.iter().filter_map(Value::as_str).map(str::to_owned).collect())
                        .unwrap_or_default(),
                    text: text_field(s, &["text", "content"]),
                    notes: text_field(s, &["notes", "speakerNotes"]),
                })
                .collect()
        })
        .unwrap_or_default()
}
