//--------------------------------------------------------------------------------------------------
// STRUCTS & ENUMS
//--------------------------------------------------------------------------------------------------
// | Name                   | Description                                      | Key Methods         |
// |------------------------|--------------------------------------------------|---------------------|
// | CourseId               | Opaque, stable course identifier                 | generate, as_str    |
// | CourseEventType        | Kind of course mutation                          | routing_key         |
// | CourseEventData        | Snapshot of the fields the index cares about     |                     |
// | CourseEvent            | Immutable notification of a course mutation      | new, accessors      |
// | CourseSnapshot         | Course as read from the content service          |                     |
// | SimilarityResult       | Snapshot plus its similarity score               | new                 |
// | SimilarCoursesResponse | Body of the "similar courses" endpoint           |                     |
//--------------------------------------------------------------------------------------------------

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque course identifier, assigned by the content service
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Produces a fresh UUIDv4 identifier.
    ///
    /// Callers that build a course or an event without an id invoke this explicitly.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CourseId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for CourseId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Kind of mutation carried by a [`CourseEvent`]
///
/// The wire name doubles as the routing key on the topic exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseEventType {
    #[serde(rename = "course.created")]
    Created,
    #[serde(rename = "course.updated")]
    Updated,
}

impl CourseEventType {
    pub fn routing_key(&self) -> &'static str {
        match self {
            CourseEventType::Created => "course.created",
            CourseEventType::Updated => "course.updated",
        }
    }
}

impl fmt::Display for CourseEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.routing_key())
    }
}

/// Fields of a course that travel inside an event
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseEventData {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl CourseEventData {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category: None,
            tags: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

/// Notification that a course was created or updated
///
/// Fields are private: once built (or decoded) an event cannot be altered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseEvent {
    event_type: CourseEventType,
    course_id: CourseId,
    data: CourseEventData,
    timestamp: DateTime<Utc>,
}

impl CourseEvent {
    /// Creates an event stamped with the current producer clock
    pub fn new(event_type: CourseEventType, course_id: CourseId, data: CourseEventData) -> Self {
        Self::at(event_type, course_id, data, Utc::now())
    }

    pub fn at(
        event_type: CourseEventType,
        course_id: CourseId,
        data: CourseEventData,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            event_type,
            course_id,
            data,
            timestamp,
        }
    }

    pub fn event_type(&self) -> CourseEventType {
        self.event_type
    }

    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    pub fn data(&self) -> &CourseEventData {
        &self.data
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn routing_key(&self) -> &'static str {
        self.event_type.routing_key()
    }
}

/// A course as returned by the content service's read interface
///
/// Upstream fields not listed here are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSnapshot {
    pub id: CourseId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CourseSnapshot {
    pub fn new(id: impl Into<CourseId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            tags: None,
            category: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

/// A candidate course together with its score against the target
///
/// Computed per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityResult {
    #[serde(flatten)]
    pub course: CourseSnapshot,
    pub similarity_score: u8,
}

impl SimilarityResult {
    pub fn new(course: CourseSnapshot, similarity_score: u8) -> Self {
        Self {
            course,
            similarity_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarCoursesResponse {
    pub course_id: CourseId,
    pub similar_courses: Vec<SimilarityResult>,
}
