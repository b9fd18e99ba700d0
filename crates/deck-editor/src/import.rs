//! File import.
//!
//! Turns a dropped or picked file into slides. Text and images are imported
//! faithfully; PPTX and PDF only get a placeholder slide naming the file.

use deck_core::datauri::{self, DataUri};
use deck_core::{Element, LayoutKind, RichText, Slide};
use thiserror::Error;

/// An opaque file handed over by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Lowercased extension, if any.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        (!stem.is_empty()).then(|| ext.to_ascii_lowercase())
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        self.name.rsplit_once('.').map_or(&self.name, |(stem, _)| stem)
    }
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("'{name}' is not valid UTF-8 text: {source}")]
    Encoding {
        name: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Convert `file` into zero or more slides. `canvas` is the slide size,
/// used to center imported images.
pub fn import_file(file: &FileDescriptor, canvas: (f32, f32)) -> Result<Vec<Slide>, ImportError> {
    let ext = file
        .extension()
        .ok_or_else(|| ImportError::Unsupported(file.name.clone()))?;
    let slides = match ext.as_str() {
        "txt" => text_slides(&decode_text(file)?, false),
        "md" | "markdown" => text_slides(&decode_text(file)?, true),
        "pptx" | "ppt" | "pdf" => vec![placeholder_slide(file)],
        other => match datauri::mime_for_extension(other) {
            Some(mime) if mime.starts_with("image/") => vec![image_slide(file, mime, canvas)],
            _ => return Err(ImportError::Unsupported(file.name.clone())),
        },
    };
    log::info!("imported {} slide(s) from {}", slides.len(), file.name);
    Ok(slides)
}

fn decode_text(file: &FileDescriptor) -> Result<String, ImportError> {
    String::from_utf8(file.bytes.clone()).map_err(|source| ImportError::Encoding {
        name: file.name.clone(),
        source,
    })
}

/// One slide per blank-line separated block: first line is the title, the
/// remaining lines the body. Markdown heading and bullet markers are
/// stripped.
fn text_slides(text: &str, markdown: bool) -> Vec<Slide> {
    let normalized = text.replace("\r\n", "\n");
    normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| {
            let mut lines = block.lines().map(str::trim_end);
            let title = lines.next().unwrap_or_default();
            let body: Vec<&str> = lines
                .map(|line| if markdown { strip_bullet(line) } else { line })
                .collect();

            let mut slide = Slide::new(if body.is_empty() {
                LayoutKind::TitleOnly
            } else {
                LayoutKind::TitleContent
            });
            slide.title = if markdown {
                title.trim_start_matches('#').trim().to_string()
            } else {
                title.trim().to_string()
            };
            slide.content = RichText::from_plain(&body.join("\n"));
            slide
        })
        .collect()
}

fn strip_bullet(line: &str) -> &str {
    let trimmed = line.trim_start();
    ["- ", "* ", "+ "]
        .iter()
        .find_map(|marker| trimmed.strip_prefix(marker))
        .unwrap_or(line)
}

fn image_slide(file: &FileDescriptor, mime: &str, canvas: (f32, f32)) -> Slide {
    let src = DataUri::new(mime, file.bytes.clone()).encode();
    let mut slide = Slide::new(LayoutKind::Blank);
    slide.title = file.stem().to_string();
    let mut el = Element::image(src, 0.0, 0.0);
    if let deck_core::ElementKind::Image(props) = &mut el.kind {
        props.alt = file.stem().to_string();
    }
    el.x = ((canvas.0 - el.width) / 2.0).max(0.0);
    el.y = ((canvas.1 - el.height) / 2.0).max(0.0);
    slide.add_element(el);
    slide
}

fn placeholder_slide(file: &FileDescriptor) -> Slide {
    let mut slide = Slide::new(LayoutKind::TitleContent);
    slide.title = file.stem().to_string();
    slide.content = RichText::from_plain(&format!(
        "Imported from {}. Slide content from this format is not extracted.",
        file.name
    ));
    slide
}
