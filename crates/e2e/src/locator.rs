//! Element locators
//!
//! A locator is a chain of CSS/text selector parts, resolved by the bridge
//! the same way Playwright composes `page.locator(sel, { hasText }).nth(i)`.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorPart {
    pub selector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nth: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    parts: Vec<LocatorPart>,
}

impl Locator {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            parts: vec![LocatorPart {
                selector: selector.into(),
                has_text: None,
                nth: None,
            }],
        }
    }

    /// Narrow the last part to elements containing `text`
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        if let Some(last) = self.parts.last_mut() {
            last.has_text = Some(text.into());
        }
        self
    }

    /// Pick the `index`-th match of the last part
    pub fn nth(mut self, index: usize) -> Self {
        if let Some(last) = self.parts.last_mut() {
            last.nth = Some(index);
        }
        self
    }

    pub fn first(self) -> Self {
        self.nth(0)
    }

    /// Descend into elements matching `selector` inside this locator
    pub fn locator(mut self, selector: impl Into<String>) -> Self {
        self.parts.push(LocatorPart {
            selector: selector.into(),
            has_text: None,
            nth: None,
        });
        self
    }

    pub fn parts(&self) -> &[LocatorPart] {
        &self.parts
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(" >> ")?;
            }
            f.write_str(&part.selector)?;
            if let Some(text) = &part.has_text {
                write!(f, " >> has-text={:?}", text)?;
            }
            if let Some(n) = part.nth {
                write!(f, " >> nth={}", n)?;
            }
        }
        Ok(())
    }
}
