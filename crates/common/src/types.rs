//! Data model shared by the suites

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// A ToDo Tasks API record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque server-assigned identifier
    pub id: String,
    pub text: String,
    pub completed: bool,
    /// Epoch milliseconds
    pub created_date: i64,
    /// Epoch milliseconds, present only while completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<i64>,
}

impl Task {
    /// Parse a task from a JSON body, checking the field types strictly.
    ///
    /// An explicit `"completedDate": null` is rejected; the field must be
    /// either a number or absent.
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::assertion("task body", "a JSON object", value))?;

        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| field_error("id", "a non-empty string", obj.get("id")))?;
        let text = obj
            .get("text")
            .and_then(Value::as_str)
            .ok_or_else(|| field_error("text", "a string", obj.get("text")))?;
        let completed = obj
            .get("completed")
            .and_then(Value::as_bool)
            .ok_or_else(|| field_error("completed", "a boolean", obj.get("completed")))?;
        let created_date = obj
            .get("createdDate")
            .and_then(Value::as_i64)
            .ok_or_else(|| field_error("createdDate", "a numeric timestamp", obj.get("createdDate")))?;
        let completed_date = match obj.get("completedDate") {
            None => None,
            Some(raw) => Some(raw.as_i64().ok_or_else(|| {
                field_error("completedDate", "a numeric timestamp or absent", Some(raw))
            })?),
        };

        Ok(Self {
            id: id.to_string(),
            text: text.to_string(),
            completed,
            created_date,
            completed_date,
        })
    }

    /// Parse a JSON array of tasks
    pub fn list_from_json(value: &Value) -> Result<Vec<Self>> {
        value
            .as_array()
            .ok_or_else(|| Error::assertion("task list body", "a JSON array", value))?
            .iter()
            .map(Task::from_json)
            .collect()
    }

    /// `completedDate` is present exactly when the task is completed
    pub fn is_consistent(&self) -> bool {
        self.completed == self.completed_date.is_some()
    }
}

fn field_error(field: &str, expected: &str, actual: Option<&Value>) -> Error {
    let actual = actual.map(Value::to_string).unwrap_or_else(|| "<absent>".to_string());
    Error::assertion(format!("task field '{field}'"), expected, actual)
}

/// Browser viewport used to repeat a journey at a given size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const DESKTOP: Viewport = Viewport { name: "Desktop", width: 1920, height: 1080 };
    pub const TABLET: Viewport = Viewport { name: "Tablet", width: 768, height: 1024 };
    pub const MOBILE: Viewport = Viewport { name: "Mobile", width: 375, height: 812 };

    pub const ALL: [Viewport; 3] = [Self::DESKTOP, Self::TABLET, Self::MOBILE];

    /// Widths below this collapse the site's main menu behind a toggle
    pub const COMPACT_BELOW: u32 = 1024;

    /// Look up a viewport by case-insensitive name
    pub fn by_name(name: &str) -> Option<Viewport> {
        Self::ALL
            .into_iter()
            .find(|vp| vp.name.eq_ignore_ascii_case(name))
    }

    pub fn is_compact(&self) -> bool {
        self.width < Self::COMPACT_BELOW
    }

    /// Label used in test names, e.g. `Desktop (1920×1080)`
    pub fn label(&self) -> String {
        format!("{} ({}×{})", self.name, self.width, self.height)
    }
}
