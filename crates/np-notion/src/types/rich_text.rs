//! Rich text spans.

use serde::{Deserialize, Serialize};

/// One run of text with independent style annotations and an optional link.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RichText {
    /// Text without any formatting.
    #[serde(default)]
    pub plain_text: String,
    /// Style annotations.
    #[serde(default)]
    pub annotations: Annotations,
    /// Text payload (absent for mentions and equations).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
    /// Resolved link target, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl RichText {
    /// Create an unstyled text span.
    #[must_use]
    pub fn plain(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            plain_text: content.clone(),
            annotations: Annotations::default(),
            text: Some(TextContent {
                content,
                link: None,
            }),
            href: None,
        }
    }

    /// Attach a link target.
    #[must_use]
    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if let Some(text) = self.text.as_mut() {
            text.link = Some(Link { url: url.clone() });
        }
        self.href = Some(url);
        self
    }

    /// Replace the annotations.
    #[must_use]
    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// Visible content of the span.
    ///
    /// Uses the text payload when present and falls back to `plain_text`
    /// for mentions and equations.
    #[must_use]
    pub fn content(&self) -> &str {
        self.text
            .as_ref()
            .map_or(self.plain_text.as_str(), |t| t.content.as_str())
    }

    /// Link target of the text payload.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.text.as_ref()?.link.as_ref().map(|l| l.url.as_str())
    }
}

/// Text payload of a `text` span.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TextContent {
    /// Text content.
    pub content: String,
    /// Optional hyperlink.
    #[serde(default)]
    pub link: Option<Link>,
}

/// Hyperlink target.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Link {
    /// Target URL.
    pub url: String,
}

/// Style annotations. Every flag is independent of the others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: Color,
}

/// Notion text color.
///
/// Unknown colors deserialize to [`Color::Default`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Gray,
    Brown,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Red,
    GrayBackground,
    BrownBackground,
    OrangeBackground,
    YellowBackground,
    GreenBackground,
    BlueBackground,
    PurpleBackground,
    PinkBackground,
    RedBackground,
    #[default]
    #[serde(other)]
    Default,
}

impl Color {
    /// CSS declaration for this color, or `None` for the default color.
    ///
    /// Background colors map to `background-color`, the rest to `color`.
    #[must_use]
    pub fn css(self) -> Option<(&'static str, &'static str)> {
        let declaration = match self {
            Self::Default => return None,
            Self::Gray => ("color", "gray"),
            Self::Brown => ("color", "brown"),
            Self::Orange => ("color", "orange"),
            Self::Yellow => ("color", "yellow"),
            Self::Green => ("color", "green"),
            Self::Blue => ("color", "blue"),
            Self::Purple => ("color", "purple"),
            Self::Pink => ("color", "pink"),
            Self::Red => ("color", "red"),
            Self::GrayBackground => ("background-color", "gray"),
            Self::BrownBackground => ("background-color", "brown"),
            Self::OrangeBackground => ("background-color", "orange"),
            Self::YellowBackground => ("background-color", "yellow"),
            Self::GreenBackground => ("background-color", "green"),
            Self::BlueBackground => ("background-color", "blue"),
            Self::PurpleBackground => ("background-color", "purple"),
            Self::PinkBackground => ("background-color", "pink"),
            Self::RedBackground => ("background-color", "red"),
        };
        Some(declaration)
    }
}
