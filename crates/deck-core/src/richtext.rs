//! Rich text as an ordered list of styled runs.
//!
//! Slide text is stored as `RichText` rather than as markup. HTML only
//! appears at the rendering boundary: `to_html` produces the fragment a
//! contentEditable region displays, and `from_html` reads such a fragment
//! back (also used for decks saved with raw markup in their text fields).
//!
//! The HTML reader is built on `winnow` and accepts the subset the editor
//! itself writes: `b/strong`, `i/em`, `u`, `s/strike/del`, `a href`,
//! `span style`, `font color/size/face`, `br`, and `div`/`p` blocks.
//! Unknown tags are dropped but their text is kept.

use crate::model::Color;
use serde::{Deserialize, Deserializer, Serialize};
use winnow::combinator::delimited;
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::take_till;

fn is_false(b: &bool) -> bool {
    !*b
}

/// Character formatting of a run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunStyle {
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl RunStyle {
    pub fn is_plain(&self) -> bool {
        *self == RunStyle::default()
    }

    fn css(&self) -> String {
        let mut parts = Vec::new();
        if let Some(c) = self.color {
            parts.push(format!("color: {}", c.to_css()));
        }
        if let Some(size) = self.font_size {
            parts.push(format!("font-size: {size}px"));
        }
        if let Some(family) = &self.font_family {
            parts.push(format!("font-family: {family}"));
        }
        parts.join("; ")
    }
}

/// A span of text sharing one style. `\n` inside `text` is a line break.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "RunStyle::is_plain")]
    pub style: RunStyle,
}

/// Formatted text: runs in reading order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct RichText {
    pub runs: Vec<TextRun>,
}

impl<'de> Deserialize<'de> for RichText {
    /// Accepts either a run array or a legacy markup string.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Runs(Vec<TextRun>),
            Markup(String),
        }
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Runs(runs) => RichText { runs },
            Repr::Markup(html) => RichText::from_html(&html),
        })
    }
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_plain(text: &str) -> Self {
        let mut rt = Self::new();
        rt.push_run(text, RunStyle::default());
        rt
    }

    /// Concatenated text without formatting.
    pub fn plain(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.is_empty())
    }

    /// Append text, merging into the last run when the style matches.
    pub fn push_run(&mut self, text: &str, style: RunStyle) {
        if text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.runs.push(TextRun {
                text: text.to_string(),
                style,
            }),
        }
    }

    /// Apply `f` to the style of characters `[start, end)`, splitting runs
    /// at the boundaries and merging equal neighbours afterwards.
    pub fn apply_style(&mut self, start: usize, end: usize, f: impl Fn(&mut RunStyle)) {
        if start >= end {
            return;
        }
        let mut out = RichText::new();
        let mut pos = 0;
        for run in std::mem::take(&mut self.runs) {
            let len = run.text.chars().count();
            let (run_start, run_end) = (pos, pos + len);
            pos = run_end;

            let lo = start.clamp(run_start, run_end) - run_start;
            let hi = end.clamp(run_start, run_end) - run_start;
            let chars: Vec<char> = run.text.chars().collect();

            let before: String = chars[..lo].iter().collect();
            let inside: String = chars[lo..hi].iter().collect();
            let after: String = chars[hi..].iter().collect();

            out.push_run(&before, run.style.clone());
            let mut styled = run.style.clone();
            f(&mut styled);
            out.push_run(&inside, styled);
            out.push_run(&after, run.style);
        }
        *self = out;
    }

    /// Serialize to an HTML fragment.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for run in &self.runs {
            let mut open = String::new();
            let mut close = Vec::new();
            let s = &run.style;
            if let Some(href) = &s.link {
                open.push_str(&format!("<a href=\"{}\">", escape(href)));
                close.push("</a>");
            }
            let css = s.css();
            if !css.is_empty() {
                open.push_str(&format!("<span style=\"{}\">", escape(&css)));
                close.push("</span>");
            }
            for (on, tag, end) in [
                (s.bold, "<b>", "</b>"),
                (s.italic, "<i>", "</i>"),
                (s.underline, "<u>", "</u>"),
                (s.strikethrough, "<s>", "</s>"),
            ] {
                if on {
                    open.push_str(tag);
                    close.push(end);
                }
            }

            html.push_str(&open);
            let mut lines = run.text.split('\n');
            if let Some(first) = lines.next() {
                html.push_str(&escape(first));
            }
            for line in lines {
                html.push_str("<br>");
                html.push_str(&escape(line));
            }
            for end in close.iter().rev() {
                html.push_str(end);
            }
        }
        html
    }

    /// Parse an HTML fragment. Never fails: malformed markup degrades to text.
    pub fn from_html(html: &str) -> Self {
        let mut out = RichText::new();
        let mut stack: Vec<(String, RunStyle)> = Vec::new();
        let mut rest = html;

        while !rest.is_empty() {
            if rest.starts_with('<') {
                let checkpoint = rest;
                match parse_tag.parse_next(&mut rest) {
                    Ok(tag) => {
                        let current = current_style(&stack);
                        handle_tag(tag, current, &mut stack, &mut out);
                    }
                    Err(_) => {
                        // Unterminated `<`: keep it as text.
                        out.push_run("<", current_style(&stack));
                        rest = &checkpoint[1..];
                    }
                }
            } else {
                let text: &str = take_till::<_, _, ContextError>(1.., '<')
                    .parse_next(&mut rest)
                    .unwrap_or_default();
                out.push_run(&unescape(text), current_style(&stack));
            }
        }
        out
    }
}

fn current_style(stack: &[(String, RunStyle)]) -> RunStyle {
    stack.last().map(|(_, s)| s.clone()).unwrap_or_default()
}

/// Raw tag body between `<` and `>`.
fn parse_tag<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited('<', take_till(0.., '>'), '>').parse_next(input)
}

fn handle_tag(body: &str, current: RunStyle, stack: &mut Vec<(String, RunStyle)>, out: &mut RichText) {
    let body = body.trim();
    if let Some(name) = body.strip_prefix('/') {
        let name = name.trim().to_ascii_lowercase();
        if let Some(pos) = stack.iter().rposition(|(n, _)| *n == name) {
            stack.truncate(pos);
        }
        if is_block(&name) {
            break_line(out, &current);
        }
        return;
    }

    let self_closing = body.ends_with('/');
    let body = body.trim_end_matches('/');
    let (name, attrs) = match body.find(char::is_whitespace) {
        Some(i) => (&body[..i], &body[i..]),
        None => (body, ""),
    };
    let name = name.to_ascii_lowercase();

    if name == "br" {
        out.push_run("\n", current);
        return;
    }
    if name.starts_with('!') || self_closing {
        return;
    }
    if is_block(&name) {
        break_line(out, &current);
    }

    let mut style = current;
    match name.as_str() {
        "b" | "strong" => style.bold = true,
        "i" | "em" => style.italic = true,
        "u" => style.underline = true,
        "s" | "strike" | "del" => style.strikethrough = true,
        "a" => style.link = attr(attrs, "href").map(|h| unescape(&h)),
        "font" => {
            if let Some(c) = attr(attrs, "color").and_then(|c| Color::from_hex(&c)) {
                style.color = Some(c);
            }
            if let Some(face) = attr(attrs, "face") {
                style.font_family = Some(face);
            }
        }
        _ => {}
    }
    if let Some(css) = attr(attrs, "style") {
        apply_css(&mut style, &unescape(&css));
    }
    stack.push((name, style));
}

fn is_block(name: &str) -> bool {
    matches!(name, "div" | "p" | "li")
}

/// Start a new line unless already at the start of one.
fn break_line(out: &mut RichText, style: &RunStyle) {
    let at_line_start = out
        .runs
        .last()
        .map(|r| r.text.ends_with('\n'))
        .unwrap_or(true);
    if !at_line_start {
        out.push_run("\n", style.clone());
    }
}

/// Extract a quoted attribute value from a tag's attribute list.
fn attr(attrs: &str, name: &str) -> Option<String> {
    let mut rest = attrs;
    while let Some(eq) = rest.find('=') {
        let key = rest[..eq].trim().rsplit(char::is_whitespace).next().unwrap_or("");
        let after = rest[eq + 1..].trim_start();
        let quote = after.chars().next()?;
        let (value, remaining) = if quote == '"' || quote == '\'' {
            let inner = &after[1..];
            let end = inner.find(quote)?;
            (&inner[..end], &inner[end + 1..])
        } else {
            let end = after.find(char::is_whitespace).unwrap_or(after.len());
            (&after[..end], &after[end..])
        };
        if key.eq_ignore_ascii_case(name) {
            return Some(value.to_string());
        }
        rest = remaining;
    }
    None
}

fn apply_css(style: &mut RunStyle, css: &str) {
    for decl in css.split(';') {
        let Some((prop, value)) = decl.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match prop.trim().to_ascii_lowercase().as_str() {
            "color" => {
                if let Some(c) = Color::from_hex(value) {
                    style.color = Some(c);
                }
            }
            "font-size" => {
                if let Ok(px) = value.trim_end_matches("px").trim().parse::<f32>() {
                    style.font_size = Some(px);
                }
            }
            "font-family" => style.font_family = Some(value.trim_matches(['"', '\'']).to_string()),
            "font-weight" => style.bold = value == "bold" || value.parse::<u16>().is_ok_and(|w| w >= 600),
            "font-style" => style.italic = value == "italic",
            "text-decoration" | "text-decoration-line" => {
                style.underline = value.contains("underline");
                style.strikethrough = value.contains("line-through");
            }
            _ => {}
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&nbsp;", "\u{a0}")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
