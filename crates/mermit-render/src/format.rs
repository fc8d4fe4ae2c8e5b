//! Output format for rendered diagrams.

/// Output format for rendered diagram artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Raster output (default, universally embeddable).
    #[default]
    Png,
    /// Vector output.
    Svg,
}

impl OutputFormat {
    /// Parse a format name. Returns `None` for anything but `png`/`svg`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    /// File extension (and format name) for this format.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(OutputFormat::parse("png"), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::parse("SVG"), Some(OutputFormat::Svg));
        assert_eq!(OutputFormat::parse("jpeg"), None);
        assert_eq!(OutputFormat::parse(""), None);
    }

    #[test]
    fn test_as_str() {
        assert_eq!(OutputFormat::Png.as_str(), "png");
        assert_eq!(OutputFormat::Svg.as_str(), "svg");
    }

    #[test]
    fn test_default_is_png() {
        assert_eq!(OutputFormat::default(), OutputFormat::Png);
    }
}
