// src/pipeline/render.rs

//! Corpus to printable HTML.
//!
//! Scraped markdown may still carry raw HTML fragments and image references.
//! Both are removed at the event level so the output is plain structural
//! markup under a single print stylesheet.

use std::path::Path;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};

use crate::error::Result;

const STYLESHEET: &str = r#"
@page { size: A4; margin: 20mm 18mm; }
body { font-family: Helvetica, sans-serif; font-size: 10pt; line-height: 1.4; }
h1 { font-size: 18pt; color: #2E3E4E; border-bottom: 1px solid #ddd; margin-top: 20pt; }
h2 { font-size: 14pt; color: #2E3E4E; margin-top: 15pt; }
h3 { font-size: 12pt; font-weight: bold; margin-top: 10pt; }
p { margin-bottom: 10pt; text-align: justify; }
code { font-family: Courier, monospace; background-color: #f4f4f4; padding: 2px; }
pre { background-color: #f4f4f4; padding: 10px; border: 1px solid #ddd; white-space: pre-wrap; }
table { width: 100%; border-collapse: collapse; margin-bottom: 15pt; }
th { background-color: #eee; border: 1px solid #ddd; padding: 5px; font-weight: bold; }
td { border: 1px solid #ddd; padding: 5px; }
hr { border: none; margin: 0; break-before: page; page-break-before: always; }
"#;

/// Render corpus markdown as a standalone, print-styled HTML document.
pub fn render_document(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(markdown, options);

    let mut body = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut body, sanitize(parser));

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>{STYLESHEET}</style>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

/// Link schemes that execute or embed content when followed.
const UNSAFE_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Drop raw HTML and images, including an image's alt text. Links with an
/// unsafe scheme lose their anchor and keep their text.
fn sanitize<'a>(events: impl Iterator<Item = Event<'a>>) -> impl Iterator<Item = Event<'a>> {
    let mut image_depth = 0usize;
    let mut links: Vec<bool> = Vec::new();
    events.filter(move |event| match event {
        Event::Start(Tag::Image { .. }) => {
            image_depth += 1;
            false
        }
        Event::End(TagEnd::Image) => {
            image_depth = image_depth.saturating_sub(1);
            false
        }
        Event::Start(Tag::Link { dest_url, .. }) => {
            let safe = !has_unsafe_scheme(dest_url);
            links.push(safe);
            safe && image_depth == 0
        }
        Event::End(TagEnd::Link) => links.pop().unwrap_or(true) && image_depth == 0,
        Event::Html(_) | Event::InlineHtml(_) => false,
        _ => image_depth == 0,
    })
}

fn has_unsafe_scheme(dest: &str) -> bool {
    let dest: String = dest
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take(16)
        .collect();
    let dest = dest.to_ascii_lowercase();
    UNSAFE_SCHEMES.iter().any(|scheme| dest.starts_with(scheme))
}

/// Convert a corpus file into an HTML document on disk.
pub async fn run_render(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<()> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let markdown = tokio::fs::read_to_string(input).await?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(output, render_document(&markdown)).await?;

    log::info!("Rendered {} to {}", input.display(), output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_strips_raw_html_and_images() {
        let markdown = "# Guide\n\n\
            <script>alert(1)</script>\n\n\
            Text with <span style=\"color:red\">inline</span> markup.\n\n\
            ![diagram](/img/arch.png)\n\n\
            <iframe src=\"https://video.example.com\"></iframe>\n";

        let html = render_document(markdown);

        assert!(html.contains("<h1>Guide</h1>"));
        assert!(html.contains("inline"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("alert(1)"));
        assert!(!html.contains("style=\"color:red\""));
        assert!(!html.contains("<img"));
        assert!(!html.contains("diagram"));
        assert!(!html.contains("<iframe"));
    }

    #[test]
    fn test_script_links_lose_their_anchor() {
        let markdown = "[click](javascript:alert(document.cookie)) and \
            [raw](JavaScript:void(0)) and [blob](data:text/html;base64,PHNjcmlwdD4=) \
            but [docs](https://ex.com/docs) stays.";

        let html = render_document(markdown);

        assert!(!html.to_lowercase().contains("javascript:"));
        assert!(!html.contains("data:text/html"));
        assert!(html.contains("click and raw and blob"));
        assert!(html.contains(r#"<a href="https://ex.com/docs">docs</a>"#));
    }

    #[test]
    fn test_tables_and_page_breaks() {
        let markdown = "# Documentation for https://ex.com/\n\n---\n\n## Source: https://ex.com/\n\n\
            | Flag | Meaning |\n| --- | --- |\n| -v | verbose |\n";

        let html = render_document(markdown);

        assert!(html.contains("<table>"));
        assert!(html.contains("<td>verbose</td>"));
        assert!(html.contains("<hr />"));
        assert!(html.contains("break-before: page"));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn test_run_render_writes_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("corpus.md");
        let output = dir.path().join("out/corpus.html");
        tokio::fs::write(&input, "# Title\n\nBody text.\n").await.unwrap();

        run_render(&input, &output).await.unwrap();

        let html = tokio::fs::read_to_string(&output).await.unwrap();
        assert!(html.contains("<p>Body text.</p>"));
    }

    #[tokio::test]
    async fn test_run_render_missing_input() {
        let dir = TempDir::new().unwrap();
        let result = run_render(dir.path().join("missing.md"), dir.path().join("out.html")).await;
        assert!(result.is_err());
    }
}
