//! File builders: declarative units of scaffolding work.

use serde_json::{Map, Value};

/// Default permission bits for files written by the scaffolder.
pub const DEFAULT_FILE_MODE: u32 = 0o600;

/// What to do when a whole-file builder targets an existing path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IfExistsAction {
    /// Leave the existing file untouched.
    Skip,
    /// Replace the existing file wholesale.
    Overwrite,
    /// Abort the scaffold pass.
    #[default]
    Error,
}

/// Code fragments to place below one marker line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerInsert {
    pub marker: String,
    pub fragments: Vec<String>,
}

/// The body of a builder: a full file, or fragments for existing markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderBody {
    Template(String),
    Inserts(Vec<MarkerInsert>),
}

/// One unit of scaffolding work targeting a single file.
///
/// `path`, template bodies and fragments are all rendered against the
/// universe context merged with `data`.
#[derive(Debug, Clone, PartialEq)]
pub struct FileBuilder {
    pub path: String,
    pub if_exists: IfExistsAction,
    pub body: BuilderBody,
    pub mode: u32,
    pub data: Map<String, Value>,
}

impl FileBuilder {
    /// A builder that writes a whole file from `template`.
    pub fn template(path: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            if_exists: IfExistsAction::default(),
            body: BuilderBody::Template(template.into()),
            mode: DEFAULT_FILE_MODE,
            data: Map::new(),
        }
    }

    /// A builder that inserts fragments into an existing file.
    pub fn inserter(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            if_exists: IfExistsAction::Overwrite,
            body: BuilderBody::Inserts(Vec::new()),
            mode: DEFAULT_FILE_MODE,
            data: Map::new(),
        }
    }

    /// Queue `fragment` below `marker`. No-op for whole-file builders.
    #[must_use]
    pub fn marker(mut self, marker: impl Into<String>, fragment: impl Into<String>) -> Self {
        if let BuilderBody::Inserts(inserts) = &mut self.body {
            let marker = marker.into();
            let fragment = fragment.into();
            match inserts.iter_mut().find(|i| i.marker == marker) {
                Some(existing) => existing.fragments.push(fragment),
                None => inserts.push(MarkerInsert {
                    marker,
                    fragments: vec![fragment],
                }),
            }
        }
        self
    }

    #[must_use]
    pub fn if_exists(mut self, action: IfExistsAction) -> Self {
        self.if_exists = action;
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    /// Extra template data visible only to this builder.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn is_inserter(&self) -> bool {
        matches!(self.body, BuilderBody::Inserts(_))
    }
}
