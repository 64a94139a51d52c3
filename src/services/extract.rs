// src/services/extract.rs

//! HTML to markdown-like text.
//!
//! Each block-level element becomes one blank-line separated block, which
//! is the unit the deduplicator works on. Lists and tables are kept whole so
//! that a navigation list reads as one link-dense block.

use scraper::{ElementRef, Html, Node, Selector};

use crate::error::{AppError, Result};
use crate::models::DiscoveredLink;

/// Subtrees that never contribute text.
const SKIPPED: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "iframe", "head", "select", "button",
    "canvas",
];

/// Elements rendered as running text inside their parent block.
const INLINE: &[&str] = &[
    "a", "abbr", "b", "bdi", "cite", "code", "del", "dfn", "em", "i", "ins", "kbd", "label",
    "mark", "q", "s", "samp", "small", "span", "strong", "sub", "sup", "time", "u", "var", "wbr",
    "br", "img",
];

/// Text content and links of one HTML document.
#[derive(Debug, Clone, Default)]
pub struct ExtractedPage {
    pub content: String,
    pub links: Vec<DiscoveredLink>,
}

/// Extract text blocks and `a[href]` links from an HTML document.
pub fn extract_page(html: &str) -> Result<ExtractedPage> {
    let document = Html::parse_document(html);
    let body_sel = parse_selector("body")?;
    let link_sel = parse_selector("a[href]")?;

    let root = document
        .select(&body_sel)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut blocks = BlockWriter::default();
    blocks.walk(root);
    blocks.flush();

    let links = document
        .select(&link_sel)
        .filter(|a| !in_skipped_subtree(*a))
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty() && !href.starts_with('#'))
        .map(DiscoveredLink::new)
        .collect();

    Ok(ExtractedPage {
        content: blocks.blocks.join("\n\n"),
        links,
    })
}

/// Whether an element sits inside a subtree that never contributes text.
fn in_skipped_subtree(element: ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| SKIPPED.contains(&ancestor.value().name()))
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[derive(Default)]
struct BlockWriter {
    blocks: Vec<String>,
    /// Loose inline text between block elements
    pending: String,
}

impl BlockWriter {
    fn walk(&mut self, container: ElementRef) {
        for child in container.children() {
            match child.value() {
                Node::Text(text) => self.pending.push_str(text),
                Node::Element(element) => {
                    let Some(child) = ElementRef::wrap(child) else {
                        continue;
                    };
                    let name = element.name();
                    if SKIPPED.contains(&name) {
                        continue;
                    }
                    if INLINE.contains(&name) {
                        inline_text(child, false, &mut self.pending);
                        continue;
                    }
                    self.flush();
                    self.element(child, name);
                }
                _ => {}
            }
        }
    }

    fn element(&mut self, element: ElementRef, name: &str) {
        match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = name[1..].parse::<usize>().unwrap_or(1);
                let text = collapsed_inline(element, false);
                if !text.is_empty() {
                    self.push(format!("{} {}", "#".repeat(level), text));
                }
            }
            "p" | "dt" | "dd" | "figcaption" | "caption" | "summary" => {
                self.push(collapsed_inline(element, false));
            }
            "blockquote" => {
                let text = collapsed_inline(element, false);
                if !text.is_empty() {
                    self.push(format!("> {text}"));
                }
            }
            "pre" => {
                let code: String = element.text().collect();
                let code = code.trim_matches('\n').trim_end();
                if !code.trim().is_empty() {
                    self.push(format!("```\n{code}\n```"));
                }
            }
            "ul" | "ol" => {
                let mut lines = Vec::new();
                list_lines(element, 0, &mut lines);
                self.push(lines.join("\n"));
            }
            "li" => {
                let text = collapsed_inline(element, false);
                if !text.is_empty() {
                    self.push(format!("- {text}"));
                }
            }
            "table" => self.push(table_lines(element).join("\n")),
            _ => {
                self.walk(element);
                self.flush();
            }
        }
    }

    fn flush(&mut self) {
        let text = collapse(&self.pending);
        self.pending.clear();
        self.push(text);
    }

    fn push(&mut self, block: String) {
        if !block.trim().is_empty() {
            self.blocks.push(block);
        }
    }
}

fn list_lines(list: ElementRef, depth: usize, lines: &mut Vec<String>) {
    for item in child_elements(list).filter(|e| e.value().name() == "li") {
        let text = collapsed_inline(item, true);
        if !text.is_empty() {
            lines.push(format!("{}- {}", "  ".repeat(depth), text));
        }
        for nested in child_elements(item).filter(|e| matches!(e.value().name(), "ul" | "ol")) {
            list_lines(nested, depth + 1, lines);
        }
    }
}

/// Pipe table rows. The first row is treated as the header.
fn table_lines(table: ElementRef) -> Vec<String> {
    let rows: Vec<Vec<String>> = table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "tr")
        .map(|row| {
            child_elements(row)
                .filter(|cell| matches!(cell.value().name(), "td" | "th"))
                .map(|cell| collapsed_inline(cell, false).replace('|', "\\|"))
                .collect::<Vec<_>>()
        })
        .filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (i, cells) in rows.iter().enumerate() {
        lines.push(format!("| {} |", cells.join(" | ")));
        if i == 0 {
            lines.push(format!("|{}", " --- |".repeat(cells.len())));
        }
    }
    lines
}

fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

fn collapsed_inline(element: ElementRef, skip_lists: bool) -> String {
    let mut out = String::new();
    inline_text(element, skip_lists, &mut out);
    collapse(&out)
}

/// Append the running text of `element`, rendering anchors as markdown links.
fn inline_text(element: ElementRef, skip_lists: bool, out: &mut String) {
    match element.value().name() {
        "a" => {
            let text = collapse(&element.text().collect::<String>());
            match element.value().attr("href").map(str::trim) {
                Some(href)
                    if !text.is_empty() && !href.is_empty() && !href.starts_with("javascript:") =>
                {
                    out.push_str(&format!("[{text}]({href})"));
                }
                _ => out.push_str(&text),
            }
            return;
        }
        "code" => {
            let text = collapse(&element.text().collect::<String>());
            if !text.is_empty() {
                out.push_str(&format!("`{text}`"));
            }
            return;
        }
        "br" => {
            out.push(' ');
            return;
        }
        "img" => return,
        _ => {}
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(inner) => {
                let name = inner.name();
                if SKIPPED.contains(&name) || (skip_lists && matches!(name, "ul" | "ol")) {
                    continue;
                }
                let Some(inner) = ElementRef::wrap(child) else {
                    continue;
                };
                // Block children of an inline context still need a word break.
                if INLINE.contains(&name) {
                    inline_text(inner, skip_lists, out);
                } else {
                    out.push(' ');
                    inline_text(inner, skip_lists, out);
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
