//! # Markup Helpers
//!
//! Just enough HTML handling for page fragments:
//!
//! - `body_inner`: the body's inner markup, which is what gets swapped in
//! - `extract_links`: `a[href]` elements, in document order
//! - `to_text`: a readable plain-text rendering for terminal hosts
//!
//! These are scanners, not a conforming HTML parser. Tag and attribute names
//! match case-insensitively; lowercasing is ASCII-only so byte offsets in the
//! lowered copy line up with the original.

/// An activatable hyperlink found in page markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub label: String,
}

/// Elements whose content is never shown.
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "template", "title"];

/// Elements that start on a new line in the text rendering.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "div", "dl", "dt", "dd", "figure", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p",
    "pre", "section", "table", "tr", "ul",
];

/// Returns the inner markup of the `<body>` element.
///
/// Documents without a body element are treated the way a browser parser
/// would: everything except the doctype, `<html>` wrapper and `<head>` ends
/// up in the body.
pub fn body_inner(html: &str) -> String {
    let lower = html.to_ascii_lowercase();

    if let Some(open) = find_tag(&lower, "body", 0) {
        let start = match lower[open..].find('>') {
            Some(gt) => open + gt + 1,
            None => return String::new(),
        };
        let end = lower
            .rfind("</body")
            .filter(|&end| end >= start)
            .unwrap_or(html.len());
        return html[start..end].to_string();
    }

    let mut out = html.to_string();
    out = remove_span(&out, "<!doctype", ">");
    out = remove_element(&out, "head");
    out = remove_tag(&out, "html");
    out.trim().to_string()
}

/// Collects every `a` element carrying an `href`, in document order.
///
/// Links inside comments and hidden elements are skipped, so the list lines
/// up one-to-one with the `[n]` markers of [`to_text`].
pub fn extract_links(html: &str) -> Vec<Link> {
    render(html).links
}

/// Renders markup as plain text. Links are followed by their 1-based index
/// in `extract_links` order (`About [1]`).
pub fn to_text(html: &str) -> String {
    render(html).text
}

struct Rendered {
    text: String,
    links: Vec<Link>,
}

/// Single pass shared by `to_text` and `extract_links`.
fn render(html: &str) -> Rendered {
    let lower = html.to_ascii_lowercase();
    let mut out = String::new();
    let mut links = Vec::new();
    // href and raw label text of the link being read
    let mut open_link: Option<(String, String)> = None;
    let mut i = 0;

    while i < html.len() {
        let rest = &html[i..];
        if !rest.starts_with('<') {
            let next = rest.find('<').unwrap_or(rest.len());
            let text = decode_entities(&rest[..next]);
            push_text(&mut out, &text);
            if let Some((_, label)) = open_link.as_mut() {
                label.push_str(&text);
            }
            i += next;
            continue;
        }

        if lower[i..].starts_with("<!--") {
            i = lower[i..]
                .find("-->")
                .map(|e| i + e + 3)
                .unwrap_or(html.len());
            continue;
        }

        let Some(gt) = tag_end(rest) else {
            break;
        };
        let tag = &lower[i + 1..i + gt];
        let closing = tag.starts_with('/');
        let name = tag_name(tag);

        if !closing && HIDDEN_ELEMENTS.contains(&name) {
            let end_pattern = format!("</{name}");
            i = match lower[i..].find(&end_pattern) {
                Some(e) => {
                    let close_start = i + e;
                    lower[close_start..]
                        .find('>')
                        .map(|g| close_start + g + 1)
                        .unwrap_or(html.len())
                }
                None => html.len(),
            };
            continue;
        }

        if name == "br" {
            trim_trailing_spaces(&mut out);
            out.push('\n');
        } else if BLOCK_ELEMENTS.contains(&name) {
            push_newline(&mut out);
        } else if name == "a" {
            // An `a` start tag also ends a link left open
            if let Some(link) = open_link.take() {
                finish_link(&mut out, &mut links, link);
            }
            if !closing {
                open_link = attr_value(&html[i + 1..i + gt], "href")
                    .map(|href| (href, String::new()));
            }
        }

        i += gt + 1;
    }

    if let Some(link) = open_link.take() {
        finish_link(&mut out, &mut links, link);
    }

    Rendered {
        text: tidy_lines(&out),
        links,
    }
}

fn finish_link(out: &mut String, links: &mut Vec<Link>, (href, label): (String, String)) {
    links.push(Link {
        href,
        label: collapse_whitespace(&label),
    });
    trim_trailing_spaces(out);
    out.push_str(&format!(" [{}]", links.len()));
}

// ============================================================================
// Scanning helpers
// ============================================================================

/// Finds the next `<name` opening tag at or after `from` in lowercased markup.
fn find_tag(lower: &str, name: &str, from: usize) -> Option<usize> {
    let pattern = format!("<{name}");
    let mut search = from;
    while let Some(found) = lower[search..].find(&pattern) {
        let pos = search + found;
        let after = pos + pattern.len();
        match lower[after..].chars().next() {
            Some(c) if c == '>' || c == '/' || c.is_ascii_whitespace() => return Some(pos),
            None => return None,
            _ => search = after,
        }
    }
    None
}

/// Tag name of the text between `<` and `>` (already lowercased).
fn tag_name(tag: &str) -> &str {
    let tag = tag.strip_prefix('/').unwrap_or(tag);
    let end = tag
        .find(|c: char| c.is_ascii_whitespace() || c == '/')
        .unwrap_or(tag.len());
    &tag[..end]
}

/// Offset of the `>` closing the tag that starts `rest`. A `>` inside a
/// quoted attribute value does not count.
fn tag_end(rest: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut after_eq = false;
    for (idx, c) in rest.char_indices().skip(1) {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '>' => return Some(idx),
            '"' | '\'' if after_eq => quote = Some(c),
            _ => {}
        }
        if !c.is_ascii_whitespace() {
            after_eq = c == '=';
        }
    }
    None
}

/// Value of attribute `name` inside a tag's source text (`a href="/x"`).
///
/// Attributes are walked one by one, so text inside another attribute's
/// quoted value never matches.
fn attr_value(tag: &str, name: &str) -> Option<String> {
    let tag = tag.strip_prefix('/').unwrap_or(tag);
    let name_end = tag
        .find(|c: char| c.is_ascii_whitespace() || c == '/')
        .unwrap_or(tag.len());
    let mut rest = &tag[name_end..];

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '/');
        if rest.is_empty() {
            return None;
        }

        let key_end = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        let key = &rest[..key_end];
        rest = rest[key_end..].trim_start();

        let value = match rest.strip_prefix('=') {
            Some(after) => {
                let after = after.trim_start();
                let (value, remaining) = match after.chars().next() {
                    Some(quote @ ('"' | '\'')) => {
                        let inner = &after[1..];
                        let end = inner.find(quote).unwrap_or(inner.len());
                        (&inner[..end], inner.get(end + 1..).unwrap_or(""))
                    }
                    _ => {
                        let end = after
                            .find(|c: char| c.is_ascii_whitespace())
                            .unwrap_or(after.len());
                        (&after[..end], &after[end..])
                    }
                };
                rest = remaining;
                Some(value)
            }
            None => None,
        };

        if key.eq_ignore_ascii_case(name) {
            return value.map(decode_entities);
        }
    }
}

/// Removes the first span starting with `open` and ending with `close`
/// (inclusive), matched case-insensitively.
fn remove_span(html: &str, open: &str, close: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let Some(start) = lower.find(open) else {
        return html.to_string();
    };
    let end = lower[start..]
        .find(close)
        .map(|e| start + e + close.len())
        .unwrap_or(html.len());
    format!("{}{}", &html[..start], &html[end..])
}

/// Removes the first `name` element together with its content.
fn remove_element(html: &str, name: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let Some(start) = find_tag(&lower, name, 0) else {
        return html.to_string();
    };
    let closing = format!("</{name}>");
    let end = match lower[start..].find(&closing) {
        Some(e) => start + e + closing.len(),
        None => lower[start..]
            .find('>')
            .map(|g| start + g + 1)
            .unwrap_or(html.len()),
    };
    format!("{}{}", &html[..start], &html[end..])
}

/// Drops the opening and closing tags of `name`, keeping their content.
fn remove_tag(html: &str, name: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let mut out = html.to_string();

    if let Some(open) = find_tag(&lower, name, 0) {
        let end = lower[open..]
            .find('>')
            .map(|g| open + g + 1)
            .unwrap_or(html.len());
        out = format!("{}{}", &html[..open], &html[end..]);
    }

    let closing = format!("</{name}>");
    let lower = out.to_ascii_lowercase();
    if let Some(pos) = lower.rfind(&closing) {
        out.replace_range(pos..pos + closing.len(), "");
    }
    out
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Text output helpers
// ============================================================================

fn push_text(out: &mut String, text: &str) {
    for c in text.chars() {
        if c.is_whitespace() {
            if !out.is_empty() && !out.ends_with(' ') && !out.ends_with('\n') {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }
}

fn push_newline(out: &mut String) {
    trim_trailing_spaces(out);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn trim_trailing_spaces(out: &mut String) {
    while out.ends_with(' ') {
        out.pop();
    }
}

/// Trims every line and collapses runs of blank lines.
fn tidy_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() && lines.last().is_none_or(|l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
