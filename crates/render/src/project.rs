//! Project export: slide decks, course outlines and lesson plans.

use std::fmt::Write as _;

use onyx_ext_core::{
    format_duration, parse_slides, resolve_effective_tier, ContentTree, Project, Slide, TierChain,
};
use serde_json::Value;

use crate::html::{escape_html, page};
use crate::report::rate_legend;

fn render_slides(slides: &[Slide]) -> String {
    let mut body = String::new();
    for (i, slide) in slides.iter().enumerate() {
        let _ = writeln!(body, "<section class=\"slide\">\n<h2>{}. {}</h2>", i + 1, escape_html(&slide.title));
        if let Some(text) = slide.text.as_deref() {
            let _ = writeln!(body, "<p>{}</p>", escape_html(text));
        }
        if !slide.bullets.is_empty() {
            body.push_str("<ul>\n");
            for bullet in &slide.bullets {
                let _ = writeln!(body, "<li>{}</li>", escape_html(bullet));
            }
            body.push_str("</ul>\n");
        }
        if let Some(notes) = slide.notes.as_deref() {
            let _ = writeln!(body, "<div class=\"notes\">{}</div>", escape_html(notes));
        }
        body.push_str("</section>\n");
    }
    body
}

fn render_outline(project: &Project, tree: &ContentTree, folder_tier: Option<&str>) -> String {
    let mut body = String::new();
    for section in &tree.sections {
        if section.lessons.is_empty() {
            continue;
        }
        let _ = writeln!(
            body,
            "<h2>{}</h2>\n<table>\n<tr><th>Lesson</th><th>Tier</th><th class=\"num\">Completion</th></tr>",
            escape_html(&section.title)
        );
        for lesson in &section.lessons {
            let tier = resolve_effective_tier(TierChain {
                lesson: lesson.quality_tier.as_deref(),
                section: section.quality_tier.as_deref(),
                project: project.quality_tier.as_deref(),
                folder: folder_tier,
            });
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td>{}</td><td class=\"num\">{}</td></tr>",
                escape_html(&lesson.title),
                tier.label(),
                format_duration(u64::from(lesson.effective_completion_minutes()))
            );
        }
        body.push_str("</table>\n");
    }
    let _ = writeln!(body, "<p class=\"meta\">{}</p>", escape_html(&rate_legend()));
    body
}

fn strings(value: Option<&Value>) -> Vec<&str> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn list(body: &mut String, heading: &str, items: &[&str]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(body, "<h2>{heading}</h2>\n<ul>");
    for item in items {
        let _ = writeln!(body, "<li>{}</li>", escape_html(item));
    }
    body.push_str("</ul>\n");
}

fn is_lesson_plan(content: &Value) -> bool {
    content.get("objectives").is_some()
        || content
            .get("sections")
            .and_then(Value::as_array)
            .is_some_and(|s| s.iter().any(|section| section.get("activities").is_some()))
}

fn render_lesson_plan(content: &Value) -> String {
    let mut body = String::new();
    list(&mut body, "Objectives", &strings(content.get("objectives")));
    list(&mut body, "Materials", &strings(content.get("materials")));

    let sections = content.get("sections").and_then(Value::as_array).cloned().unwrap_or_default();
    if !sections.is_empty() {
        body.push_str("<h2>Plan</h2>\n<table>\n<tr><th>Section</th><th class=\"num\">Duration</th><th>Activities</th></tr>\n");
        for section in &sections {
            let title = section.get("title").and_then(Value::as_str).unwrap_or("");
            let minutes = section.get("duration_minutes").and_then(Value::as_u64).unwrap_or(0);
            let activities = strings(section.get("activities"))
                .iter()
                .map(|a| escape_html(a))
                .collect::<Vec<_>>()
                .join("<br>");
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td class=\"num\">{}</td><td>{activities}</td></tr>",
                escape_html(title),
                format_duration(minutes)
            );
        }
        body.push_str("</table>\n");
    }
    if let Some(assessment) = content.get("assessment").and_then(Value::as_str) {
        let _ = writeln!(body, "<h2>Assessment</h2>\n<p>{}</p>", escape_html(assessment));
    }
    body
}

/// Render a project's content as a printable HTML document.
///
/// Slide decks take precedence, then section/lesson outlines, then lesson
/// plans; anything else is dumped as formatted JSON.
#[must_use]
pub fn render_project_html(project: &Project, folder_tier: Option<&str>) -> String {
    let title = project.display_name();
    let content = &project.microproduct_content;
    let mut body = format!("<h1>{}</h1>\n", escape_html(title));
    if let Some(minutes) = project.completion_time.filter(|m| *m > 0) {
        let _ = writeln!(
            body,
            "<div class=\"meta\">Completion time: {}</div>",
            format_duration(u64::from(minutes.unsigned_abs()))
        );
    }

    let slides = parse_slides(content);
    let tree = ContentTree::from_value(content);
    if !slides.is_empty() {
        body.push_str(&render_slides(&slides));
    } else if !tree.is_empty() {
        body.push_str(&render_outline(project, &tree, folder_tier));
    } else if is_lesson_plan(content) {
        body.push_str(&render_lesson_plan(content));
    } else {
        let pretty = serde_json::to_string_pretty(content).unwrap_or_default();
        let _ = writeln!(body, "<pre>{}</pre>", escape_html(&pretty));
    }
    page(title, &body)
}
