//! Path normalization.
//!
//! Turns raw, dash-separated field identifiers from the editing surface into
//! camel-cased section and key names, and cleans up captured values.
//!
//! ```text
//! page "about", section "about-hero", field "about-hero-title"
//!     -> ("hero", "heroTitle")
//! ```

use crate::extract::FieldValue;

/// Default origin serving uploaded assets.
pub const DEFAULT_ASSET_ORIGIN: &str = "http://localhost:3001";

/// A leaf field after normalization, before routing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedField {
    /// Section name (prefix-stripped, camel-cased).
    pub section: String,
    /// Key name (prefix-stripped, camel-cased).
    pub key: String,
    /// Captured value (trimmed; image URLs made root-relative).
    pub value: String,
}

/// Normalizes identifiers and values captured from the editing surface.
#[derive(Clone, Debug)]
pub struct PathNormalizer {
    /// Known asset origins, without trailing slash.
    asset_origins: Vec<String>,
}

impl Default for PathNormalizer {
    fn default() -> Self {
        Self::new([DEFAULT_ASSET_ORIGIN])
    }
}

impl PathNormalizer {
    /// Create a normalizer that strips the given asset origins from image URLs.
    #[must_use]
    pub fn new<I, S>(asset_origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            asset_origins: asset_origins
                .into_iter()
                .map(|o| o.as_ref().trim_end_matches('/').to_owned())
                .filter(|o| !o.is_empty())
                .collect(),
        }
    }

    /// Normalize a raw identifier for a page.
    ///
    /// Strips a leading `{page_name}-` and camel-cases the remaining
    /// dash-separated segments.
    #[must_use]
    pub fn identifier(page_name: &str, raw: &str) -> String {
        let stripped = raw
            .strip_prefix(page_name)
            .and_then(|rest| rest.strip_prefix('-'))
            .unwrap_or(raw);
        to_camel_case(stripped)
    }

    /// Normalize a captured value.
    ///
    /// Text is trimmed. Image references have a known asset origin removed so
    /// only the root-relative path remains. Returns `None` for empty values,
    /// which count as "no edit".
    #[must_use]
    pub fn value(&self, value: &FieldValue) -> Option<String> {
        let normalized = match value {
            FieldValue::Text(text) => text.trim().to_owned(),
            FieldValue::Image(url) => self.asset_path(url.trim()),
        };
        (!normalized.is_empty()).then_some(normalized)
    }

    /// Make an asset URL root-relative if it points at a known asset origin.
    ///
    /// URLs on other hosts are returned unchanged.
    #[must_use]
    pub fn asset_path(&self, url: &str) -> String {
        self.asset_origins
            .iter()
            .find_map(|origin| {
                url.strip_prefix(origin.as_str())
                    .filter(|rest| rest.starts_with('/'))
            })
            .unwrap_or(url)
            .to_owned()
    }

    /// Normalize one leaf field found under a section boundary.
    ///
    /// Returns `None` when the value is empty.
    #[must_use]
    pub fn normalize(
        &self,
        page_name: &str,
        raw_section: &str,
        raw_field: &str,
        value: &FieldValue,
    ) -> Option<NormalizedField> {
        Some(NormalizedField {
            section: Self::identifier(page_name, raw_section),
            key: Self::identifier(page_name, raw_field),
            value: self.value(value)?,
        })
    }
}

/// Join dash-separated segments into a camel-case key.
///
/// `read-more-button` becomes `readMoreButton`; names without dashes are
/// returned unchanged.
#[must_use]
pub fn to_camel_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());

    for (i, segment) in raw.split('-').filter(|s| !s.is_empty()).enumerate() {
        if i == 0 {
            out.push_str(segment);
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }

    out
}
