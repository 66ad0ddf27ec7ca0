//! Page content document model.
//!
//! A [`PageContentDocument`] is the persisted content of one page: a mapping of
//! canonical section names to JSON values, a published flag and timestamps.
//!
//! Section values are plain JSON (`serde_json::Value`). A section is normally an
//! object whose keys hold scalars, nested objects, or lists of records.

use chrono::{DateTime, SecondsFormat, Utc};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::defaults::default_sections;
use crate::store::{StoreError, StoreErrorKind};

/// Canonical section name → section value.
pub type Sections = Map<String, Value>;

/// Maximum accepted page name length.
const MAX_PAGE_NAME_LEN: usize = 64;

/// Persisted content record for one page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContentDocument {
    /// Unique page key (e.g. "home", "about", "services").
    pub page_name: String,
    /// Canonical section name → section content.
    pub sections: Sections,
    /// Whether the document was published.
    pub published: bool,
    /// When the document was first persisted (or synthesized).
    pub created_at: DateTime<Utc>,
    /// When the document was last persisted (or synthesized).
    pub updated_at: DateTime<Utc>,
}

impl PageContentDocument {
    /// Synthesize an unpublished document from the default template for `page_name`.
    #[must_use]
    pub fn from_template(page_name: &str, now: DateTime<Utc>) -> Self {
        Self {
            page_name: page_name.to_owned(),
            sections: default_sections(page_name),
            published: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Revision token of this document state.
    #[must_use]
    pub fn revision(&self) -> Revision {
        Revision::of(&self.page_name, &self.updated_at)
    }
}

/// Opaque token identifying one persisted state of a page.
///
/// Formatted like a strong HTTP `ETag` (quoted, 16 hex chars) so it can travel
/// in `ETag` / `If-Match` headers unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Revision(String);

impl Revision {
    /// Compute the revision for a page name and update timestamp.
    #[must_use]
    pub fn of(page_name: &str, updated_at: &DateTime<Utc>) -> Self {
        let stamp = updated_at.to_rfc3339_opts(SecondsFormat::Nanos, true);
        let hash = Md5::digest(format!("{page_name}:{stamp}").as_bytes());
        Self(format!("\"{}\"", &hex::encode(hash)[..16]))
    }

    /// Parse a revision from an `ETag`-style header value.
    ///
    /// Accepts quoted or bare tokens; a weak `W/` prefix is ignored.
    /// Returns `None` for empty values and for `*`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let value = value.strip_prefix("W/").unwrap_or(value);
        let bare = value.trim_matches('"');
        if bare.is_empty() || bare == "*" {
            return None;
        }
        Some(Self(format!("\"{bare}\"")))
    }

    /// Header representation (quoted).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Condition a write must satisfy against the currently persisted document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Precondition {
    /// No check; the last writer wins.
    #[default]
    Any,
    /// The page must not be persisted yet.
    Missing,
    /// The persisted document must be at this revision.
    Matches(Revision),
}

impl Precondition {
    /// Check the precondition against the currently persisted document.
    #[must_use]
    pub fn holds(&self, current: Option<&PageContentDocument>) -> bool {
        match self {
            Self::Any => true,
            Self::Missing => current.is_none(),
            Self::Matches(expected) => current.is_some_and(|doc| doc.revision() == *expected),
        }
    }
}

/// A document as returned by a fetch, with its revision when persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchedPage {
    /// The stored or synthesized document.
    pub document: PageContentDocument,
    /// `None` when the document was synthesized from a default template.
    pub revision: Option<Revision>,
}

impl FetchedPage {
    /// Wrap a persisted document.
    #[must_use]
    pub fn persisted(document: PageContentDocument) -> Self {
        let revision = Some(document.revision());
        Self { document, revision }
    }

    /// Wrap a synthesized (not yet persisted) document.
    #[must_use]
    pub fn synthesized(document: PageContentDocument) -> Self {
        Self {
            document,
            revision: None,
        }
    }

    /// Precondition that only succeeds if nobody wrote the page since this fetch.
    #[must_use]
    pub fn precondition(&self) -> Precondition {
        self.revision
            .clone()
            .map_or(Precondition::Missing, Precondition::Matches)
    }
}

/// Validate a page name.
///
/// Page names are non-empty, at most 64 characters, and contain only ASCII
/// alphanumerics, `-` and `_`. This keeps them safe as file names.
pub fn validate_page_name(page_name: &str) -> Result<(), StoreError> {
    let valid = !page_name.is_empty()
        && page_name.len() <= MAX_PAGE_NAME_LEN
        && page_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StoreError::new(StoreErrorKind::InvalidPageName).with_page(page_name))
    }
}

/// Build the document that replaces `current` on a write.
///
/// Keeps the original `created_at` and stamps `updated_at` with `now`.
pub(crate) fn upsert(
    current: Option<&PageContentDocument>,
    page_name: &str,
    sections: Sections,
    published: bool,
    precondition: &Precondition,
    now: DateTime<Utc>,
) -> Result<PageContentDocument, StoreError> {
    if !precondition.holds(current) {
        return Err(StoreError::new(StoreErrorKind::Conflict).with_page(page_name));
    }

    // Two writes inside the same clock tick would share a revision.
    let updated_at = match current {
        Some(doc) if doc.updated_at >= now => doc.updated_at + chrono::Duration::nanoseconds(1),
        _ => now,
    };

    Ok(PageContentDocument {
        page_name: page_name.to_owned(),
        sections,
        published,
        created_at: current.map_or(now, |doc| doc.created_at),
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn sections(value: Value) -> Sections {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_document_serializes_camel_case() {
        let doc = PageContentDocument {
            page_name: "about".to_owned(),
            sections: sections(json!({"hero": {"title": "Hi"}})),
            published: true,
            created_at: at(0),
            updated_at: at(60),
        };

        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["pageName"], "about");
        assert_eq!(json["sections"]["hero"]["title"], "Hi");
        assert_eq!(json["published"], true);
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00Z");
        assert_eq!(json["updatedAt"], "1970-01-01T00:01:00Z");
    }

    #[test]
    fn test_from_template_is_unpublished() {
        let doc = PageContentDocument::from_template("contact", at(10));

        assert!(!doc.published);
        assert_eq!(doc.created_at, doc.updated_at);
        assert!(doc.sections.contains_key("info"));
    }

    #[test]
    fn test_revision_changes_with_timestamp() {
        assert_ne!(Revision::of("home", &at(1)), Revision::of("home", &at(2)));
        assert_ne!(Revision::of("home", &at(1)), Revision::of("about", &at(1)));
    }

    #[test]
    fn test_revision_format() {
        let revision = Revision::of("home", &at(1));

        assert!(revision.as_str().starts_with('"'));
        assert!(revision.as_str().ends_with('"'));
        assert_eq!(revision.as_str().len(), 18);
    }

    #[test]
    fn test_revision_parse() {
        let revision = Revision::of("home", &at(1));
        let bare = revision.as_str().trim_matches('"');

        assert_eq!(Revision::parse(revision.as_str()), Some(revision.clone()));
        assert_eq!(Revision::parse(bare), Some(revision.clone()));
        assert_eq!(
            Revision::parse(&format!("W/{revision}")),
            Some(revision.clone())
        );
        assert_eq!(Revision::parse("*"), None);
        assert_eq!(Revision::parse("  "), None);
    }

    #[test]
    fn test_precondition_holds() {
        let doc = PageContentDocument::from_template("home", at(5));
        let revision = doc.revision();

        assert!(Precondition::Any.holds(None));
        assert!(Precondition::Any.holds(Some(&doc)));
        assert!(Precondition::Missing.holds(None));
        assert!(!Precondition::Missing.holds(Some(&doc)));
        assert!(Precondition::Matches(revision.clone()).holds(Some(&doc)));
        assert!(!Precondition::Matches(revision).holds(None));
        assert!(!Precondition::Matches(Revision::of("home", &at(6))).holds(Some(&doc)));
    }

    #[test]
    fn test_fetched_page_precondition() {
        let doc = PageContentDocument::from_template("home", at(5));

        assert_eq!(
            FetchedPage::synthesized(doc.clone()).precondition(),
            Precondition::Missing
        );
        assert_eq!(
            FetchedPage::persisted(doc.clone()).precondition(),
            Precondition::Matches(doc.revision())
        );
    }

    #[test]
    fn test_validate_page_name() {
        assert!(validate_page_name("home").is_ok());
        assert!(validate_page_name("case-studies_2").is_ok());

        let too_long = "x".repeat(65);
        for bad in ["", "../etc", "a/b", "home page", too_long.as_str()] {
            let err = validate_page_name(bad).unwrap_err();
            assert_eq!(err.kind, StoreErrorKind::InvalidPageName, "{bad:?}");
        }
    }

    #[test]
    fn test_upsert_preserves_created_at() {
        let existing = PageContentDocument::from_template("home", at(1));

        let doc = upsert(
            Some(&existing),
            "home",
            Sections::new(),
            true,
            &Precondition::Any,
            at(100),
        )
        .unwrap();

        assert_eq!(doc.created_at, at(1));
        assert_eq!(doc.updated_at, at(100));
        assert!(doc.published);
    }

    #[test]
    fn test_upsert_new_document() {
        let doc = upsert(None, "home", Sections::new(), false, &Precondition::Missing, at(7))
            .unwrap();

        assert_eq!(doc.created_at, at(7));
        assert_eq!(doc.updated_at, at(7));
    }

    #[test]
    fn test_upsert_same_tick_advances_revision() {
        let existing = PageContentDocument::from_template("home", at(9));

        let doc = upsert(
            Some(&existing),
            "home",
            Sections::new(),
            true,
            &Precondition::Any,
            at(9),
        )
        .unwrap();

        assert!(doc.updated_at > existing.updated_at);
        assert_ne!(doc.revision(), existing.revision());
    }

    #[test]
    fn test_upsert_conflict() {
        let existing = PageContentDocument::from_template("home", at(1));

        let err = upsert(
            Some(&existing),
            "home",
            Sections::new(),
            true,
            &Precondition::Missing,
            at(2),
        )
        .unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::Conflict);
        assert_eq!(err.page.as_deref(), Some("home"));
    }
}
