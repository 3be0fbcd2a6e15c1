//! Embedded structured metadata: JSON-LD, OpenGraph, microdata, RDFa-style
//! `property` attributes and Dublin Core `<meta>` names.
//!
//! Every scheme is parsed into one [`MetadataNode`] tree, and a depth-bounded
//! visitor pulls the human-readable fields out of it.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;
use url::Url;

/// Nodes at this depth or deeper are never visited. The root sits at depth 1.
pub const MAX_RECURSION_DEPTH: usize = 10;

/// Keys whose scalar values are collected as text.
pub const TARGET_KEYS: &[&str] = &["content", "og:description"];

/// Keys whose whole subtree is ignored.
pub const SKIP_KEYS: &[&str] = &["microformat", "@context"];

const MAX_MICRODATA_NESTING: usize = 32;
const MAX_DOM_DESCENT: usize = 256;

static SELECTOR_BASE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("base[href]").unwrap());
static SELECTOR_JSON_LD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());
static SELECTOR_META: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta").unwrap());
static SELECTOR_PROPERTY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[property]").unwrap());
static SELECTOR_ITEMSCOPE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[itemscope]").unwrap());

/// Untyped metadata, as heterogeneous as the schemes that produce it.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataNode {
    Scalar(String),
    List(Vec<MetadataNode>),
    Map(Vec<(String, MetadataNode)>),
}

impl MetadataNode {
    fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Map(entries) => entries.is_empty(),
        }
    }
}

impl From<Value> for MetadataNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Scalar(String::new()),
            Value::Bool(b) => Self::Scalar(b.to_string()),
            Value::Number(n) => Self::Scalar(n.to_string()),
            Value::String(s) => Self::Scalar(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

/// Readable text from a page's embedded metadata, fragments joined by ". ".
pub fn extract_metadata(html: &str, url: &Url) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let document = Html::parse_document(html);
    let base_url = effective_base_url(&document, url);
    let tree = parse_metadata(&document, &base_url);

    collect_text(&tree)
        .into_iter()
        .filter(|fragment| !fragment.trim().is_empty())
        .collect::<Vec<_>>()
        .join(". ")
}

/// The page URL, overridden by an in-document `<base href>` when present.
pub fn effective_base_url(document: &Html, url: &Url) -> Url {
    document
        .select(&SELECTOR_BASE)
        .next()
        .and_then(|base| base.value().attr("href"))
        .and_then(|href| url.join(href.trim()).ok())
        .unwrap_or_else(|| url.clone())
}

/// Parse every scheme present into a root map keyed by scheme name.
pub fn parse_metadata(document: &Html, base_url: &Url) -> MetadataNode {
    let schemes = [
        ("json-ld", json_ld(document)),
        ("opengraph", opengraph(document)),
        ("microdata", microdata(document, base_url)),
        ("rdfa", rdfa(document)),
        ("dublincore", dublin_core(document)),
    ];

    MetadataNode::Map(
        schemes
            .into_iter()
            .filter(|(_, node)| !node.is_empty())
            .map(|(name, node)| (name.to_string(), node))
            .collect(),
    )
}

/// Depth-first walk collecting scalar values stored under target keys.
pub fn collect_text(node: &MetadataNode) -> Vec<&str> {
    let mut fragments = Vec::new();
    scan(node, 1, &mut fragments);
    fragments
}

fn scan<'a>(node: &'a MetadataNode, depth: usize, out: &mut Vec<&'a str>) {
    if depth >= MAX_RECURSION_DEPTH {
        return;
    }
    match node {
        MetadataNode::Scalar(_) => {}
        MetadataNode::List(items) => {
            for item in items {
                scan(item, depth + 1, out);
            }
        }
        MetadataNode::Map(entries) => {
            for (key, value) in entries {
                if SKIP_KEYS.contains(&key.as_str()) {
                    continue;
                }
                if TARGET_KEYS.contains(&key.as_str())
                    && let MetadataNode::Scalar(text) = value
                {
                    out.push(text);
                }
                scan(value, depth + 1, out);
            }
        }
    }
}

fn json_ld(document: &Html) -> MetadataNode {
    let blocks = document
        .select(&SELECTOR_JSON_LD)
        .filter_map(|script| {
            let raw = script.text().collect::<String>();
            serde_json::from_str::<Value>(raw.trim()).ok()
        })
        .map(MetadataNode::from)
        .collect();
    MetadataNode::List(blocks)
}

fn opengraph(document: &Html) -> MetadataNode {
    let properties: Vec<_> = document
        .select(&SELECTOR_META)
        .filter_map(|meta| {
            let property = meta.value().attr("property")?.trim();
            let content = meta.value().attr("content")?;
            property
                .starts_with("og:")
                .then(|| (property.to_string(), MetadataNode::scalar(content)))
        })
        .collect();

    if properties.is_empty() {
        MetadataNode::List(Vec::new())
    } else {
        MetadataNode::List(vec![MetadataNode::Map(properties)])
    }
}

fn rdfa(document: &Html) -> MetadataNode {
    let properties: Vec<_> = document
        .select(&SELECTOR_PROPERTY)
        .filter_map(|element| {
            let property = element.value().attr("property")?.trim();
            if property.is_empty() || property.starts_with("og:") {
                return None;
            }
            let value = match element.value().attr("content") {
                Some(content) => content.to_string(),
                None => normalize_text(element),
            };
            Some((property.to_string(), MetadataNode::Scalar(value)))
        })
        .collect();

    if properties.is_empty() {
        MetadataNode::List(Vec::new())
    } else {
        MetadataNode::List(vec![MetadataNode::Map(properties)])
    }
}

fn dublin_core(document: &Html) -> MetadataNode {
    let elements = document
        .select(&SELECTOR_META)
        .filter_map(|meta| {
            let name = meta.value().attr("name")?.trim();
            let lowered = name.to_ascii_lowercase();
            if !(lowered.starts_with("dc.") || lowered.starts_with("dcterms.")) {
                return None;
            }
            let content = meta.value().attr("content").unwrap_or_default();
            Some(MetadataNode::Map(vec![
                ("name".to_string(), MetadataNode::scalar(name)),
                ("content".to_string(), MetadataNode::scalar(content)),
            ]))
        })
        .collect();
    MetadataNode::List(elements)
}

fn microdata(document: &Html, base_url: &Url) -> MetadataNode {
    let items = document
        .select(&SELECTOR_ITEMSCOPE)
        .filter(|element| element.value().attr("itemprop").is_none())
        .map(|element| microdata_item(element, base_url, 0))
        .collect();
    MetadataNode::List(items)
}

fn microdata_item(scope: ElementRef<'_>, base_url: &Url, nesting: usize) -> MetadataNode {
    let mut entries = Vec::new();
    if let Some(item_type) = scope.value().attr("itemtype") {
        entries.push(("type".to_string(), MetadataNode::scalar(item_type.trim())));
    }
    if let Some(id) = scope.value().attr("itemid") {
        entries.push(("id".to_string(), MetadataNode::Scalar(resolve(base_url, id))));
    }

    let mut properties: Vec<(String, MetadataNode)> = Vec::new();
    if nesting < MAX_MICRODATA_NESTING {
        collect_properties(scope, base_url, nesting, 0, &mut properties);
    }
    entries.push(("properties".to_string(), MetadataNode::Map(properties)));
    MetadataNode::Map(entries)
}

/// Properties belong to the nearest enclosing scope, so nested scopes stop
/// the descent and become values of their own `itemprop`.
fn collect_properties(
    parent: ElementRef<'_>,
    base_url: &Url,
    nesting: usize,
    descent: usize,
    properties: &mut Vec<(String, MetadataNode)>,
) {
    if descent >= MAX_DOM_DESCENT {
        return;
    }
    for child in parent.children().filter_map(ElementRef::wrap) {
        let element = child.value();
        let is_scope = element.attr("itemscope").is_some();

        if let Some(names) = element.attr("itemprop") {
            let value = if is_scope {
                microdata_item(child, base_url, nesting + 1)
            } else {
                MetadataNode::Scalar(property_value(child, base_url))
            };
            for name in names.split_whitespace() {
                push_property(properties, name, value.clone());
            }
        }

        if !is_scope {
            collect_properties(child, base_url, nesting, descent + 1, properties);
        }
    }
}

fn push_property(properties: &mut Vec<(String, MetadataNode)>, name: &str, value: MetadataNode) {
    match properties.iter_mut().find(|(key, _)| key == name) {
        Some((_, MetadataNode::List(values))) => values.push(value),
        Some((_, existing)) => {
            let first = std::mem::replace(existing, MetadataNode::List(Vec::new()));
            *existing = MetadataNode::List(vec![first, value]);
        }
        None => properties.push((name.to_string(), value)),
    }
}

fn property_value(element: ElementRef<'_>, base_url: &Url) -> String {
    let el = element.value();
    let attr = |name: &str| el.attr(name).map(str::to_string);
    let value = match el.name() {
        "meta" => attr("content"),
        "a" | "area" | "link" => el.attr("href").map(|href| resolve(base_url, href)),
        "audio" | "embed" | "iframe" | "img" | "source" | "track" | "video" => {
            el.attr("src").map(|src| resolve(base_url, src))
        }
        "object" => el.attr("data").map(|data| resolve(base_url, data)),
        "data" | "meter" => attr("value"),
        "time" => attr("datetime"),
        _ => None,
    };
    value.unwrap_or_else(|| attr("content").unwrap_or_else(|| normalize_text(element)))
}

fn resolve(base_url: &Url, reference: &str) -> String {
    base_url
        .join(reference.trim())
        .map(String::from)
        .unwrap_or_else(|_| reference.to_string())
}

fn normalize_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}
