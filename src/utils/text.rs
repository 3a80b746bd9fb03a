//! Plain-text helpers for posting bodies.

use scraper::{ElementRef, Html};

/// Elements whose boundaries separate words.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "blockquote", "br", "dd", "div", "dl", "dt", "h1", "h2", "h3", "h4", "h5", "h6",
    "hr", "li", "ol", "p", "pre", "table", "td", "th", "tr", "ul",
];

/// Convert an HTML fragment (as served by the HN API) into plain text.
///
/// Tags are removed, entities such as `&#x2F;` are decoded and block
/// boundaries become single spaces. Inline markup joins its text directly,
/// so `<i>Go</i>lang` reads `Golang`.
pub fn html_to_text(html: &str) -> String {
    if !html.contains(['<', '&']) {
        return collapse_whitespace(html);
    }

    let fragment = Html::parse_fragment(html);
    let mut text = String::with_capacity(html.len());
    push_text(fragment.root_element(), &mut text);
    collapse_whitespace(&text)
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    let block = BLOCK_ELEMENTS.contains(&element.value().name());
    if block {
        out.push(' ');
    }
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            push_text(child, out);
        }
    }
    if block {
        out.push(' ');
    }
}

/// Replace every whitespace run with one space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max_chars` characters of the plain text, with an ellipsis when cut.
pub fn headline(text: &str, max_chars: usize) -> String {
    let plain = html_to_text(text);
    let mut line: String = plain.chars().take(max_chars).collect();
    if plain.chars().count() > max_chars {
        line.push('…');
    }
    line
}
