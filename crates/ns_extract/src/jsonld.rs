use scraper::{Html, Selector};
use serde_json::Value;

/// Every JSON-LD object in the document, with top-level arrays and `@graph`
/// containers flattened.
pub fn objects(document: &Html) -> Vec<Value> {
    let mut objects = Vec::new();

    if let Ok(script_selector) = Selector::parse("script[type='application/ld+json']") {
        for script in document.select(&script_selector) {
            let raw = script.text().collect::<String>();
            if let Ok(json) = serde_json::from_str::<Value>(raw.trim()) {
                flatten(json, &mut objects);
            }
        }
    }

    objects
}

fn flatten(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten(item, out);
            }
        }
        Value::Object(mut obj) => {
            if let Some(graph) = obj.remove("@graph") {
                flatten(graph, out);
            }
            out.push(Value::Object(obj));
        }
        _ => {}
    }
}

/// Extracts authors from JSON-LD metadata in the HTML document.
pub fn extract_authors(document: &Html) -> Vec<String> {
    let mut authors = Vec::new();

    for json in objects(document) {
        match json.get("author") {
            Some(Value::Array(arr)) => {
                for author in arr {
                    push_author(author, &mut authors);
                }
            }
            Some(author) => push_author(author, &mut authors),
            None => {}
        }
    }

    authors
}

fn push_author(author: &Value, authors: &mut Vec<String>) {
    let name = match author {
        Value::Object(obj) => obj.get("name").and_then(|n| n.as_str()),
        Value::String(s) => Some(s.as_str()),
        _ => None,
    };
    if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
        authors.push(name.to_string());
    }
}

pub fn extract_date_published(document: &Html) -> Option<String> {
    objects(document).into_iter().find_map(|json| {
        json.get("datePublished")
            .and_then(|d| d.as_str())
            .map(|d| d.trim().to_string())
    })
}
