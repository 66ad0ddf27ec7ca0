//! Section routing.
//!
//! Editor markup for several pages still uses legacy or alternate section
//! names. The router maps them onto the canonical section names the public
//! renderer reads, and applies per-page key aliases where the editor's field
//! name differs from the renderer's.

use serde::Deserialize;

/// Kind of page, as far as routing is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageKind {
    /// `services` page.
    Services,
    /// `products` page.
    Products,
    /// `projects` page.
    Projects,
    /// `contact` page.
    Contact,
    /// Every other page; section names are already canonical.
    Other,
}

impl PageKind {
    /// Determine the page kind from a page name.
    #[must_use]
    pub fn from_page_name(page_name: &str) -> Self {
        match page_name {
            "services" => Self::Services,
            "products" => Self::Products,
            "projects" => Self::Projects,
            "contact" => Self::Contact,
            _ => Self::Other,
        }
    }

    /// Legacy `{kind}Content` section name for listing pages.
    fn content_alias(self) -> Option<&'static str> {
        match self {
            Self::Services => Some("servicesContent"),
            Self::Products => Some("productsContent"),
            Self::Projects => Some("projectsContent"),
            Self::Contact | Self::Other => None,
        }
    }
}

/// Renames a key inside one section of one page.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct KeyAlias {
    /// Page name the alias applies to.
    pub page: String,
    /// Canonical section name the alias applies to.
    pub section: String,
    /// Key produced by the editor.
    pub from: String,
    /// Key the renderer reads.
    pub to: String,
}

impl KeyAlias {
    /// Create a key alias.
    #[must_use]
    pub fn new(page: &str, section: &str, from: &str, to: &str) -> Self {
        Self {
            page: page.to_owned(),
            section: section.to_owned(),
            from: from.to_owned(),
            to: to.to_owned(),
        }
    }
}

/// Built-in key aliases.
///
/// The about page renderer reads `hero.title`, but its editor tags the field
/// `about-hero-title`, which normalizes to `heroTitle`.
fn builtin_key_aliases() -> Vec<KeyAlias> {
    vec![KeyAlias::new("about", "hero", "heroTitle", "title")]
}

/// Maps page-local section names and keys onto the canonical schema.
#[derive(Clone, Debug)]
pub struct SectionRouter {
    key_aliases: Vec<KeyAlias>,
}

impl Default for SectionRouter {
    fn default() -> Self {
        Self {
            key_aliases: builtin_key_aliases(),
        }
    }
}

impl SectionRouter {
    /// Create a router with the built-in aliases plus `extra` ones.
    ///
    /// Extra aliases are consulted after the built-in ones.
    #[must_use]
    pub fn with_key_aliases(extra: impl IntoIterator<Item = KeyAlias>) -> Self {
        let mut key_aliases = builtin_key_aliases();
        key_aliases.extend(extra);
        Self { key_aliases }
    }

    /// Canonical section name for a normalized section name on a page.
    ///
    /// Rules are checked in order and the first match wins.
    #[must_use]
    pub fn section(page_name: &str, section: &str) -> String {
        let kind = PageKind::from_page_name(page_name);

        let canonical = match kind {
            PageKind::Services | PageKind::Products | PageKind::Projects => {
                let is_header = section == "hero"
                    || section == "content"
                    || kind.content_alias() == Some(section);
                is_header.then_some("header")
            }
            PageKind::Contact => match section {
                s if s.to_ascii_lowercase().contains("info") => Some("info"),
                "content" | "contactContent" => Some("info"),
                "hero" | "contactHero" => Some("hero"),
                "form" | "contactForm" => Some("form"),
                "map" | "contactMap" => Some("map"),
                _ => None,
            },
            PageKind::Other => None,
        };

        canonical.unwrap_or(section).to_owned()
    }

    /// Canonical key for a normalized key inside a canonical section.
    #[must_use]
    pub fn key(&self, page_name: &str, section: &str, key: &str) -> String {
        self.key_aliases
            .iter()
            .find(|alias| alias.page == page_name && alias.section == section && alias.from == key)
            .map_or(key, |alias| alias.to.as_str())
            .to_owned()
    }
}
