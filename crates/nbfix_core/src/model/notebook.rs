//! Notebook document model.
//!
//! # Responsibility
//! - Mirror the JSON notebook layout (format 4) closely enough to rewrite
//!   cells without losing fields this crate does not understand.
//! - Offer one canonical text view of a cell source regardless of whether
//!   it was stored as a string or as a list of lines.
//!
//! # Invariants
//! - Unknown notebook/cell fields round-trip through `extra` untouched,
//!   numbers included (`serde_json` keeps their original text).
//! - `CellSource::replace_text` keeps the storage kind (string vs lines).
//! - Canonical serialization sorts object keys and indents with one space.

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

/// Notebook major format version accepted by this crate.
pub const SUPPORTED_NBFORMAT: u32 = 4;

/// Cell kind tag (`cell_type` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    Markdown,
    Code,
    Raw,
}

/// Cell source as stored on disk.
///
/// Notebook writers emit either one joined string or a list of line strings
/// (each keeping its `\n`); both are valid and must be preserved on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellSource {
    Joined(String),
    Lines(Vec<String>),
}

impl Default for CellSource {
    fn default() -> Self {
        Self::Joined(String::new())
    }
}

impl CellSource {
    /// Returns the full source text; line lists are concatenated as-is.
    pub fn text(&self) -> String {
        match self {
            Self::Joined(text) => text.clone(),
            Self::Lines(lines) => lines.concat(),
        }
    }

    /// Replaces the source text, keeping the current storage kind.
    pub fn replace_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        *self = match self {
            Self::Joined(_) => Self::Joined(text),
            Self::Lines(_) => Self::Lines(split_keep_line_endings(&text)),
        };
    }
}

fn split_keep_line_endings(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

/// One notebook cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub cell_type: CellType,
    /// Stable cell identifier (required from format 4.5 on).
    pub id: Option<String>,
    pub source: CellSource,
    /// `metadata`, `outputs`, `execution_count`, `attachments`, ...
    pub extra: Map<String, Value>,
}

impl Cell {
    /// Creates a cell with no id and no extra fields.
    pub fn new(cell_type: CellType, source: CellSource) -> Self {
        Self {
            cell_type,
            id: None,
            source,
            extra: Map::new(),
        }
    }

    /// Returns whether this cell carries a non-empty id.
    pub fn has_id(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let Value::Object(mut fields) = value else {
            return Err(serde_json::Error::custom("cell must be a JSON object"));
        };

        let cell_type = fields
            .remove("cell_type")
            .ok_or_else(|| serde_json::Error::custom("missing field `cell_type`"))?;
        let id = match fields.remove("id") {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value(value)?),
        };
        let source = match fields.remove("source") {
            None => CellSource::default(),
            Some(value) => serde_json::from_value(value)?,
        };

        Ok(Self {
            cell_type: serde_json::from_value(cell_type)?,
            id,
            source,
            extra: fields,
        })
    }

    fn to_value(&self) -> Result<Value, serde_json::Error> {
        let mut fields = self.extra.clone();
        fields.insert("cell_type".to_string(), serde_json::to_value(self.cell_type)?);
        if let Some(id) = &self.id {
            fields.insert("id".to_string(), Value::String(id.clone()));
        }
        fields.insert("source".to_string(), serde_json::to_value(&self.source)?);
        Ok(Value::Object(fields))
    }
}

/// In-memory notebook document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Notebook {
    pub nbformat: u32,
    pub nbformat_minor: u32,
    pub metadata: Map<String, Value>,
    pub cells: Vec<Cell>,
    /// Top-level fields other than the ones above.
    pub extra: Map<String, Value>,
}

impl Notebook {
    /// Creates a format-4.5 notebook with empty metadata.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            nbformat: SUPPORTED_NBFORMAT,
            nbformat_minor: 5,
            metadata: Map::new(),
            cells,
            extra: Map::new(),
        }
    }

    /// Parses a notebook from its JSON text.
    ///
    /// The text is read into a `Value` tree first; only the fields this
    /// crate rewrites are lifted out, everything else stays in `extra`.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let Value::Object(mut fields) = serde_json::from_str::<Value>(text)? else {
            return Err(serde_json::Error::custom("notebook must be a JSON object"));
        };

        let nbformat = take_version(&mut fields, "nbformat")?;
        let nbformat_minor = take_version(&mut fields, "nbformat_minor")?;
        let metadata = match fields.remove("metadata") {
            None => Map::new(),
            Some(Value::Object(metadata)) => metadata,
            Some(_) => return Err(serde_json::Error::custom("`metadata` must be an object")),
        };
        let cells = match fields.remove("cells") {
            None => Vec::new(),
            Some(Value::Array(cells)) => cells
                .into_iter()
                .map(Cell::from_value)
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(serde_json::Error::custom("`cells` must be an array")),
        };

        Ok(Self {
            nbformat,
            nbformat_minor,
            metadata,
            cells,
            extra: fields,
        })
    }

    /// Serializes into the canonical on-disk layout.
    ///
    /// Keys are sorted (via `serde_json::Map` ordering), indentation is one
    /// space, non-ASCII text is written as UTF-8 and the output ends with `\n`.
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        let mut fields = self.extra.clone();
        fields.insert("nbformat".to_string(), Value::from(self.nbformat));
        fields.insert("nbformat_minor".to_string(), Value::from(self.nbformat_minor));
        fields.insert("metadata".to_string(), Value::Object(self.metadata.clone()));
        let cells = self
            .cells
            .iter()
            .map(Cell::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        fields.insert("cells".to_string(), Value::Array(cells));

        let mut buffer = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b" "));
        Value::Object(fields).serialize(&mut serializer)?;
        buffer.push(b'\n');
        // serde_json only emits valid UTF-8.
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn take_version(fields: &mut Map<String, Value>, key: &str) -> Result<u32, serde_json::Error> {
    let value = fields
        .remove(key)
        .ok_or_else(|| serde_json::Error::custom(format!("missing field `{key}`")))?;
    value
        .as_u64()
        .and_then(|version| u32::try_from(version).ok())
        .ok_or_else(|| serde_json::Error::custom(format!("`{key}` must be a non-negative integer")))
}
