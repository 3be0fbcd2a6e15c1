//! Main-content extraction for link-heavy pages.
//!
//! The body is cut into text blocks at block-level element boundaries. Each
//! block carries its word count and how many of those words sit inside links;
//! a block is kept when it, or its neighbourhood, looks like running prose.

use ego_tree::iter::Edge;
use scraper::{Html, Node, Selector};
use std::sync::LazyLock;

/// Lines with fewer tokens than this are treated as navigation chrome.
pub const MIN_SENTENCE_TOKENS: usize = 7;

static SELECTOR_BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());

const IGNORED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "iframe", "head", "object", "select",
    "textarea", "button",
];

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "br", "caption", "dd", "details",
    "dialog", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1",
    "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre",
    "section", "summary", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub num_words: usize,
    pub num_linked_words: usize,
}

impl TextBlock {
    pub fn link_density(&self) -> f64 {
        if self.num_words == 0 {
            0.0
        } else {
            self.num_linked_words as f64 / self.num_words as f64
        }
    }
}

#[derive(Default)]
struct BlockBuilder {
    buffer: String,
    linked_words: usize,
    blocks: Vec<TextBlock>,
}

impl BlockBuilder {
    fn push_text(&mut self, text: &str, in_anchor: bool) {
        if in_anchor {
            self.linked_words += count_words(text);
        }
        self.buffer.push_str(text);
    }

    fn flush(&mut self) {
        let text = self.buffer.split_whitespace().collect::<Vec<_>>().join(" ");
        let linked = std::mem::take(&mut self.linked_words);
        self.buffer.clear();

        let num_words = count_words(&text);
        if num_words == 0 {
            return;
        }
        self.blocks.push(TextBlock {
            text,
            num_words,
            num_linked_words: linked.min(num_words),
        });
    }
}

fn count_words(text: &str) -> usize {
    text.split_whitespace()
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .count()
}

/// Segment a document's body into text blocks in document order.
pub fn text_blocks(html: &str) -> Vec<TextBlock> {
    let document = Html::parse_document(html);
    let Some(body) = document.select(&SELECTOR_BODY).next() else {
        return Vec::new();
    };

    let mut builder = BlockBuilder::default();
    let mut ignored_depth = 0usize;
    let mut anchor_depth = 0usize;

    // Iterative traversal: deeply nested markup must not exhaust the stack.
    for edge in body.traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Element(element) => {
                    let name = element.name();
                    if ignored_depth > 0 || IGNORED_TAGS.contains(&name) {
                        ignored_depth += 1;
                        continue;
                    }
                    if BLOCK_TAGS.contains(&name) {
                        builder.flush();
                    }
                    if name == "a" {
                        anchor_depth += 1;
                    }
                }
                Node::Text(text) if ignored_depth == 0 => {
                    builder.push_text(text, anchor_depth > 0);
                }
                _ => {}
            },
            Edge::Close(node) => {
                if let Node::Element(element) = node.value() {
                    if ignored_depth > 0 {
                        ignored_depth -= 1;
                        continue;
                    }
                    let name = element.name();
                    if name == "a" {
                        anchor_depth = anchor_depth.saturating_sub(1);
                    }
                    if BLOCK_TAGS.contains(&name) {
                        builder.flush();
                    }
                }
            }
        }
    }
    builder.flush();
    builder.blocks
}

/// Classify blocks as content using the previous and next block as context.
pub fn classify(blocks: &[TextBlock]) -> Vec<bool> {
    let empty = TextBlock::default();
    (0..blocks.len())
        .map(|i| {
            let prev = if i == 0 { &empty } else { &blocks[i - 1] };
            let curr = &blocks[i];
            let next = blocks.get(i + 1).unwrap_or(&empty);

            let linked_before_prose = curr.link_density() > 0.0 && next.num_words > 11;
            let long_block = curr.num_words > 19;
            let prose_context = next.num_words > 6
                && next.link_density() == 0.0
                && prev.link_density() == 0.0
                && (curr.num_words > 6 || prev.num_words > 7 || next.num_words > 19);

            linked_before_prose || long_block || prose_context
        })
        .collect()
}

/// Content blocks of a document, one per line.
pub fn canola_content(html: &str) -> String {
    let blocks = text_blocks(html);
    let keep = classify(&blocks);
    blocks
        .into_iter()
        .zip(keep)
        .filter_map(|(block, keep)| keep.then_some(block.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keep sentence-like lines and join them with ". ".
///
/// A line survives with at least [`MIN_SENTENCE_TOKENS`] whitespace tokens;
/// one trailing period is removed from each survivor before joining.
pub fn filter_sentences(content: &str) -> String {
    content
        .split('\n')
        .map(str::trim)
        .filter(|line| line.split_whitespace().count() >= MIN_SENTENCE_TOKENS)
        .map(|line| line.strip_suffix('.').unwrap_or(line))
        .collect::<Vec<_>>()
        .join(". ")
}
