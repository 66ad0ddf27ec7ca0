//! Built-in default templates.
//!
//! Pages that were never published are served from these templates. Section
//! and key names are the canonical ones the public renderer reads.

use serde_json::{Value, json};

use crate::document::Sections;

/// Default sections for a page name.
///
/// Unknown page names get an empty mapping.
#[must_use]
pub fn default_sections(page_name: &str) -> Sections {
    let template = match page_name {
        "home" => home(),
        "about" => about(),
        "services" => listing("Our Services", "What we can build for you"),
        "products" => listing("Our Products", "Tools and components we ship"),
        "projects" => listing("Our Projects", "Selected work for our clients"),
        "contact" => contact(),
        _ => return Sections::new(),
    };

    match template {
        Value::Object(sections) => sections,
        _ => Sections::new(),
    }
}

fn home() -> Value {
    json!({
        "hero": {
            "title": "Building what comes next",
            "subtitle": "Engineering, design and delivery under one roof",
            "readMoreButton": "Learn more",
            "backgroundImage": "/uploads/home-hero.jpg"
        },
        "about": {
            "title": "Who we are",
            "description": "A small team with a long track record."
        },
        "faq": {
            "title": "Frequently asked questions",
            "questions": []
        }
    })
}

fn about() -> Value {
    json!({
        "hero": {
            "title": "About us",
            "subtitle": "Our story, our people",
            "companyName": "",
            "image": ""
        },
        "mission": {
            "title": "Our mission",
            "description": ""
        },
        "values": {
            "title": "What we value",
            "items": []
        },
        "faq": {
            "title": "Frequently asked questions",
            "questions": []
        }
    })
}

fn listing(title: &str, subtitle: &str) -> Value {
    json!({
        "header": {
            "title": title,
            "subtitle": subtitle,
            "backgroundImage": ""
        },
        "cta": {
            "title": "Have a project in mind?",
            "buttonText": "Get in touch"
        }
    })
}

fn contact() -> Value {
    json!({
        "hero": {
            "title": "Contact us",
            "subtitle": "We usually reply within one business day"
        },
        "info": {
            "address": "",
            "phone": "",
            "email": "",
            "workingHours": ""
        },
        "form": {
            "title": "Send us a message",
            "submitButton": "Send"
        },
        "map": {
            "embedUrl": ""
        }
    })
}
