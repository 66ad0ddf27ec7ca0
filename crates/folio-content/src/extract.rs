//! Field extraction.
//!
//! An [`EditSurface`] describes what the editor currently shows: section
//! boundaries tagged with raw section ids, each holding leaf fields tagged with
//! raw field ids and their current values. The [`FieldExtractor`] turns it into
//! a draft `{ section: { key: value } }` using canonical names.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use folio_store::Sections;

use crate::normalize::PathNormalizer;
use crate::routing::SectionRouter;

/// Current value of a leaf field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    /// Plain text.
    Text(String),
    /// Image reference (absolute or root-relative URL).
    Image(String),
}

/// A tagged leaf field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafField {
    /// Raw field identifier (e.g. `about-hero-title`).
    pub id: String,
    /// Current value.
    pub value: FieldValue,
}

/// A tagged section boundary and the leaf fields inside it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionBoundary {
    /// Raw section identifier (e.g. `about-hero`).
    pub id: String,
    /// Leaf fields in document order.
    #[serde(default)]
    pub fields: Vec<LeafField>,
}

/// The editable surface of one page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSurface {
    /// Section boundaries in document order.
    #[serde(default)]
    pub sections: Vec<SectionBoundary>,
}

impl EditSurface {
    /// Create an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field, creating the section boundary if needed.
    #[must_use]
    pub fn with_text(mut self, section_id: &str, field_id: &str, text: &str) -> Self {
        self.set_field(section_id, field_id, FieldValue::Text(text.to_owned()));
        self
    }

    /// Add an image field, creating the section boundary if needed.
    #[must_use]
    pub fn with_image(mut self, section_id: &str, field_id: &str, url: &str) -> Self {
        self.set_field(section_id, field_id, FieldValue::Image(url.to_owned()));
        self
    }

    /// Set the value of a field.
    ///
    /// Replaces the value if the field already exists under `section_id`,
    /// otherwise appends it (and the section boundary if missing).
    pub fn set_field(&mut self, section_id: &str, field_id: &str, value: FieldValue) {
        let index = match self.sections.iter().position(|s| s.id == section_id) {
            Some(index) => index,
            None => {
                self.sections.push(SectionBoundary {
                    id: section_id.to_owned(),
                    fields: Vec::new(),
                });
                self.sections.len() - 1
            }
        };
        let section = &mut self.sections[index];

        match section.fields.iter_mut().find(|f| f.id == field_id) {
            Some(field) => field.value = value,
            None => section.fields.push(LeafField {
                id: field_id.to_owned(),
                value,
            }),
        }
    }
}

/// Builds draft content from an [`EditSurface`].
#[derive(Clone, Debug, Default)]
pub struct FieldExtractor {
    normalizer: PathNormalizer,
    router: SectionRouter,
}

impl FieldExtractor {
    /// Create an extractor from a normalizer and a router.
    #[must_use]
    pub fn new(normalizer: PathNormalizer, router: SectionRouter) -> Self {
        Self { normalizer, router }
    }

    /// Extract the draft for `page_name`.
    ///
    /// Each canonical section is first seeded with the nested objects and lists
    /// of the same section in `working`; those are edited through dedicated
    /// controls and are not visible as leaf fields. Leaf fields are then laid on
    /// top. Empty values are skipped, and sections that end up empty are left
    /// out of the draft.
    #[must_use]
    pub fn extract(&self, page_name: &str, surface: &EditSurface, working: &Sections) -> Sections {
        let mut draft = Sections::new();

        for boundary in &surface.sections {
            let section_name =
                SectionRouter::section(page_name, &PathNormalizer::identifier(page_name, &boundary.id));

            let entry = draft
                .entry(section_name.clone())
                .or_insert_with(|| Value::Object(non_scalars(working.get(&section_name))));
            let Value::Object(section) = entry else {
                continue;
            };

            for field in &boundary.fields {
                let Some(normalized) =
                    self.normalizer
                        .normalize(page_name, &boundary.id, &field.id, &field.value)
                else {
                    continue;
                };
                let key = self.router.key(page_name, &section_name, &normalized.key);
                section.insert(key, Value::String(normalized.value));
            }
        }

        draft.retain(|_, value| value.as_object().is_none_or(|section| !section.is_empty()));
        draft
    }
}

/// Nested objects and lists of a working section.
fn non_scalars(section: Option<&Value>) -> Sections {
    section
        .and_then(Value::as_object)
        .map(|section| {
            section
                .iter()
                .filter(|(_, value)| value.is_object() || value.is_array())
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default()
}
