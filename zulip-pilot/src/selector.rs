/// Represents ways to locate an element on the page.
///
/// Anchors in this crate are either DOM ids or CSS selectors; everything the
/// workflow waits on is expressed as one of these.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Select by element id
    Id(String),
    /// Select by CSS selector
    Css(String),
    /// Represents an invalid selector string, with a reason.
    Invalid(String),
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Id(id) => write!(f, "#{id}"),
            Selector::Css(css) => write!(f, "css:{css}"),
            Selector::Invalid(reason) => write!(f, "invalid:{reason}"),
        }
    }
}

impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        let s = s.trim();
        match s {
            "" => Selector::Invalid("empty selector string".to_string()),
            _ if s.starts_with('#') => Selector::Id(s[1..].to_string()),
            _ if s.starts_with("id:") => Selector::Id(s[3..].to_string()),
            _ if s.starts_with("css:") => Selector::Css(s[4..].to_string()),
            // Anything else is taken as a raw CSS selector
            _ => Selector::Css(s.to_string()),
        }
    }
}

impl From<String> for Selector {
    fn from(s: String) -> Self {
        Selector::from(s.as_str())
    }
}

impl From<&String> for Selector {
    fn from(s: &String) -> Self {
        Selector::from(s.as_str())
    }
}
