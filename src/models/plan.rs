use secrecy::SecretString;
use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// A validated study-plan request. Keys live only as long as the request.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub topic: String,
    pub level: String,
    pub search_api_key: SecretString,
    pub llm_api_key: SecretString,
}

/// Plain text assembled from fetched web content. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeBase(String);

impl KnowledgeBase {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub name: String,
    pub subtopics: Vec<String>,
}

/// Chapter name to subtopics, kept in the order the model produced them.
///
/// Inserting an existing chapter name replaces its subtopics in place, the
/// same way a mapping literal with a repeated key keeps the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyPlan {
    chapters: Vec<Chapter>,
}

impl StudyPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, subtopics: Vec<String>) {
        let name = name.into();
        match self.chapters.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.subtopics = subtopics,
            None => self.chapters.push(Chapter { name, subtopics }),
        }
    }

    pub fn chapters(&self) -> impl Iterator<Item = &Chapter> {
        self.chapters.iter()
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.chapters
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.subtopics.as_slice())
    }

    pub fn chapter_names(&self) -> Vec<&str> {
        self.chapters.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn subtopic_count(&self) -> usize {
        self.chapters.iter().map(|c| c.subtopics.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

impl Serialize for StudyPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.chapters.len()))?;
        for chapter in &self.chapters {
            map.serialize_entry(&chapter.name, &chapter.subtopics)?;
        }
        map.end()
    }
}

/// Reads a `{chapter: [subtopic, ...]}` object, keeping chapter order.
impl<'de> Deserialize<'de> for StudyPlan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StudyPlanVisitor;

        impl<'de> Visitor<'de> for StudyPlanVisitor {
            type Value = StudyPlan;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of chapter names to lists of subtopics")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<StudyPlan, A::Error> {
                let mut plan = StudyPlan::new();
                while let Some((name, subtopics)) = access.next_entry::<String, Vec<String>>()? {
                    plan.insert(name, subtopics);
                }
                Ok(plan)
            }
        }

        deserializer.deserialize_map(StudyPlanVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtopicLinks {
    pub subtopic: String,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedChapter {
    pub name: String,
    pub subtopics: Vec<SubtopicLinks>,
}

impl EnrichedChapter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subtopics: Vec::new(),
        }
    }

    pub fn insert(&mut self, subtopic: impl Into<String>, urls: Vec<String>) {
        let subtopic = subtopic.into();
        match self.subtopics.iter_mut().find(|s| s.subtopic == subtopic) {
            Some(existing) => existing.urls = urls,
            None => self.subtopics.push(SubtopicLinks { subtopic, urls }),
        }
    }

    pub fn links_for(&self, subtopic: &str) -> Option<&[String]> {
        self.subtopics
            .iter()
            .find(|s| s.subtopic == subtopic)
            .map(|s| s.urls.as_slice())
    }
}

impl Serialize for EnrichedChapter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.subtopics.len()))?;
        for entry in &self.subtopics {
            map.serialize_entry(&entry.subtopic, &entry.urls)?;
        }
        map.end()
    }
}

/// Chapter to subtopic to resource URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichedStudyPlan {
    chapters: Vec<EnrichedChapter>,
}

impl EnrichedStudyPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chapter: EnrichedChapter) {
        match self.chapters.iter_mut().find(|c| c.name == chapter.name) {
            Some(existing) => *existing = chapter,
            None => self.chapters.push(chapter),
        }
    }

    pub fn get(&self, name: &str) -> Option<&EnrichedChapter> {
        self.chapters.iter().find(|c| c.name == name)
    }

    pub fn chapter_names(&self) -> Vec<&str> {
        self.chapters.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

impl Serialize for EnrichedStudyPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.chapters.len()))?;
        for chapter in &self.chapters {
            map.serialize_entry(&chapter.name, chapter)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Quiz(String);

impl Quiz {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanSuccess {
    #[serde(rename = "StudyPlan")]
    pub study_plan: EnrichedStudyPlan,
    #[serde(rename = "Quiz")]
    pub quiz: Quiz,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanFailure {
    pub status: &'static str,
    pub error: String,
}

impl PlanFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: "failed",
            error: error.into(),
        }
    }
}

/// Top-level outcome of one pipeline run. There is no partial-success variant.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PlanResult {
    Success(PlanSuccess),
    Failed(PlanFailure),
}

impl PlanResult {
    pub fn is_success(&self) -> bool {
        matches!(self, PlanResult::Success(_))
    }
}
