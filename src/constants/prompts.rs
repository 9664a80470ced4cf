use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

pub const STUDY_PLAN_SYSTEM_PROMPT: &str = "You are an experienced curriculum designer who builds clear, well-sequenced study plans from reference material.";

pub const STUDY_PLAN_PROMPT: &str = "Task: Generate a Structured Study/Learning Plan.

Objective: Create a structured study/learning plan for a specified topic, taking into account the user's study level. This should be designed to assist users in planning their study approach efficiently.

Instructions:
Use the below user information to create the plan for the user. Assume the user has access to information in the form of web articles.
1. Topic: {topic} - the topic for which the user needs a study plan.
2. Level: {level} - whether the user is a beginner, intermediate, or advanced in this subject matter.

Output Response Template:
1. Chapter 1: Introduction to [topic]
- Subtopics or concepts to cover:
    - [Subtopic 1]
    - [Subtopic 2]
    - [Subtopic 3]
2. Chapter 2:
- Subtopics or concepts to cover:
    - [Subtopic 4]
    - [Subtopic 5]
3. Chapter 3:
- Subtopics or concepts to cover:
    - [Subtopic 6]
    - [Subtopic 7]

Important Note: Continue this structure for the entire study plan, extending for further chapters. Generate the structured learning plan directly without additional questions. Tailor the plan to the user's study level and follow the output response template for consistency.

Use the topic information below to make a detailed and curated study/learning plan:
Topic Information: ```{knowledge_base}```";

pub const STRUCTURING_SYSTEM_PROMPT: &str = "You convert study plans into machine-readable data. Reply with the data only.";

pub const STRUCTURING_PROMPT: &str = "From the given study plan create a dictionary with each chapter title as a key and the list of its subtopics as the value.

Rules:
- Output a single JSON object, for example {\"Chapter 1: Introduction\": [\"First subtopic\", \"Second subtopic\"]}.
- Keys and values are plain strings. Do not nest objects inside the lists.
- Do not add commentary before or after the object.

STUDY PLAN: {plan_text}";

pub const QUIZ_SYSTEM_PROMPT: &str = "You are a teacher writing assessments that check understanding of a study plan.";

pub const QUIZ_PROMPT: &str = "Generate a quiz on {topic} with 10-15 multiple choice questions (3-4 answer options each). You can use the following topic information and study/learning plan:

Topic information:
{knowledge_base}

Study/Learning Plan:
{learning_plan}

Important Note: The quiz should roughly evaluate the study/learning plan. Also give the correct answer key for the quiz at the end.";

static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([a-z_]+)\}").expect("PLACEHOLDER_REGEX is a valid regex pattern")
});

/// Fills `{name}` placeholders in a template.
///
/// Only the template is scanned, so values that themselves contain braces
/// (web page text, model output) are inserted verbatim. Unknown placeholders
/// and literal braces that are not placeholders are left untouched.
pub fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    let rendered: Cow<'_, str> = PLACEHOLDER_REGEX.replace_all(template, |caps: &Captures<'_>| {
        let name = &caps[1];
        values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
            .unwrap_or_else(|| caps[0].to_string())
    });
    rendered.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template_fills_all_placeholders() {
        let rendered = render_template(
            STUDY_PLAN_PROMPT,
            &[("topic", "Rust"), ("level", "beginner"), ("knowledge_base", "kb text")],
        );

        assert!(rendered.contains("Topic: Rust"));
        assert!(rendered.contains("Level: beginner"));
        assert!(rendered.contains("```kb text```"));
        assert!(!rendered.contains("{topic}"));
        assert!(!rendered.contains("{knowledge_base}"));
    }

    #[test]
    fn test_render_template_does_not_expand_placeholders_inside_values() {
        let rendered = render_template(
            "{a} and {b}",
            &[("a", "literal {b}"), ("b", "second")],
        );

        assert_eq!(rendered, "literal {b} and second");
    }

    #[test]
    fn test_render_template_leaves_json_example_intact() {
        let rendered = render_template(STRUCTURING_PROMPT, &[("plan_text", "Chapter 1")]);

        assert!(rendered.contains("{\"Chapter 1: Introduction\": [\"First subtopic\", \"Second subtopic\"]}"));
        assert!(rendered.ends_with("STUDY PLAN: Chapter 1"));
    }

    #[test]
    fn test_quiz_prompt_requests_answer_key() {
        assert!(QUIZ_PROMPT.contains("10-15 multiple choice questions"));
        assert!(QUIZ_PROMPT.contains("answer key"));
    }
}
