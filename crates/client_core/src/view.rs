//! Presentation state shared by the page controllers.

/// Whether an element is rendered. Both the modal and the preview
/// elements use this single representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Hidden,
    Shown,
}

impl Visibility {
    pub fn is_shown(self) -> bool {
        matches!(self, Visibility::Shown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Auto,
    Visible,
    Scroll,
    Hidden,
}

impl Overflow {
    pub fn as_css(self) -> &'static str {
        match self {
            Overflow::Auto => "auto",
            Overflow::Visible => "visible",
            Overflow::Scroll => "scroll",
            Overflow::Hidden => "hidden",
        }
    }
}

/// The page body. Only scroll behaviour is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BodyState {
    pub overflow: Overflow,
}
