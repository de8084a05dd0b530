//! Link annotations and the candidate links reconstructed from them.

use serde::{Deserialize, Serialize};

use super::Rect;

/// Subtype name of link annotations.
pub const LINK_SUBTYPE: &str = "Link";

/// A link annotation as read from a page's `/Annots` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkAnnotation {
    /// Annotation `/Subtype` (only `Link` is used)
    pub subtype: String,
    /// External target (`/A /URI`)
    pub url: Option<String>,
    /// Navigation target (`page=N` or a named destination)
    pub destination: Option<String>,
    /// Other document a `GoToR` link opens; `destination` then refers to it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Active area in page coordinates
    pub rect: Rect,
}

impl LinkAnnotation {
    /// Create a URI link annotation.
    pub fn uri(url: impl Into<String>, rect: Rect) -> Self {
        Self {
            subtype: LINK_SUBTYPE.to_string(),
            url: Some(url.into()),
            destination: None,
            file: None,
            rect,
        }
    }

    /// Create an internal-destination link annotation.
    pub fn internal(destination: impl Into<String>, rect: Rect) -> Self {
        Self {
            subtype: LINK_SUBTYPE.to_string(),
            url: None,
            destination: Some(destination.into()),
            file: None,
            rect,
        }
    }

    /// Create a link into another document.
    pub fn remote(file: impl Into<String>, destination: Option<String>, rect: Rect) -> Self {
        Self {
            subtype: LINK_SUBTYPE.to_string(),
            url: None,
            destination,
            file: Some(file.into()),
            rect,
        }
    }

    /// Check if the annotation is a link.
    pub fn is_link(&self) -> bool {
        self.subtype == LINK_SUBTYPE
    }

    /// The Markdown target of this annotation.
    ///
    /// URLs always qualify. Destinations qualify only when
    /// `resolve_destinations` is set and are marked with a leading `#` so
    /// they cannot be mistaken for URLs; links into another document become
    /// `file#destination`.
    pub fn target(&self, resolve_destinations: bool) -> Option<String> {
        if let Some(url) = self.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            return Some(url.to_string());
        }
        if !resolve_destinations {
            return None;
        }
        let dest = self
            .destination
            .as_deref()
            .map(|d| d.trim().trim_start_matches('#'))
            .filter(|d| !d.is_empty());
        let file = self.file.as_deref().map(str::trim).filter(|f| !f.is_empty());

        match (file, dest) {
            (Some(file), Some(dest)) => Some(format!("{}#{}", file, dest)),
            (Some(file), None) => Some(file.to_string()),
            (None, Some(dest)) => Some(format!("#{}", dest)),
            (None, None) => None,
        }
    }
}

/// Where a candidate link starts on its page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkPosition {
    pub x: f32,
    pub y: f32,
    /// Page number (1-indexed)
    pub page: u32,
}

/// A span of text matched to a link annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateLink {
    /// Link text as reconstructed from the runs
    pub text: String,
    /// Markdown target (URL or `#destination`)
    pub url: String,
    /// Position of the first run of the span
    pub position: LinkPosition,
    /// Horizontal extent of the merged span on its baseline
    pub bounds: Rect,
}

impl CandidateLink {
    /// Render as Markdown link syntax.
    pub fn to_markdown(&self) -> String {
        format!("[{}]({})", self.text.trim(), self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_prefers_url() {
        let annot = LinkAnnotation::uri("https://example.com", Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(annot.target(false).as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_target_destination_requires_opt_in() {
        let annot = LinkAnnotation::internal("page=3", Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(annot.target(false), None);
        assert_eq!(annot.target(true).as_deref(), Some("#page=3"));

        let annot = LinkAnnotation::internal("#chapter2", Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(annot.target(true).as_deref(), Some("#chapter2"));
    }

    #[test]
    fn test_remote_target() {
        let rect = Rect::new(0.0, 0.0, 1.0, 1.0);
        let annot = LinkAnnotation::remote("manual.pdf", None, rect);
        assert_eq!(annot.target(false), None);
        assert_eq!(annot.target(true).as_deref(), Some("manual.pdf"));

        let annot = LinkAnnotation::remote("manual.pdf", Some("intro".to_string()), rect);
        assert_eq!(annot.target(true).as_deref(), Some("manual.pdf#intro"));
    }

    #[test]
    fn test_blank_url_is_ignored() {
        let annot = LinkAnnotation::uri("  ", Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(annot.target(true), None);
    }
}
