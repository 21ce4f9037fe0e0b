//! Navigation targets inside a document.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which point of the visible area a viewport anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Anchor {
    /// The anchor is the centre of the visible area
    #[default]
    Center,
    /// The anchor is the top-left corner of the visible area
    TopLeft,
}

impl Anchor {
    /// Numeric code used in the string form.
    pub fn code(self) -> u8 {
        match self {
            Anchor::Center => 1,
            Anchor::TopLeft => 2,
        }
    }

    /// Inverse of [`Anchor::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Anchor::Center),
            2 => Some(Anchor::TopLeft),
            _ => None,
        }
    }
}

/// A page plus an optional normalized position on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Zero-based page index
    pub page: usize,
    /// Normalized horizontal position
    pub x: f64,
    /// Normalized vertical position
    pub y: f64,
    /// What the position refers to
    pub anchor: Anchor,
    /// Whether `x`, `y` and `anchor` are meaningful
    pub enabled: bool,
}

impl Viewport {
    /// A viewport that only selects a page.
    pub fn page(page: usize) -> Self {
        Self {
            page,
            x: 0.0,
            y: 0.0,
            anchor: Anchor::Center,
            enabled: false,
        }
    }

    /// A viewport with a position on the page.
    pub fn at(page: usize, x: f64, y: f64, anchor: Anchor) -> Self {
        Self {
            page,
            x,
            y,
            anchor,
            enabled: true,
        }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.page)?;
        if self.enabled {
            write!(f, ";C2:{}:{}:{}", self.x, self.y, self.anchor.code())?;
        }
        Ok(())
    }
}

/// Error returned when a viewport string cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid viewport string: {0:?}")]
pub struct ParseViewportError(pub String);

impl FromStr for Viewport {
    type Err = ParseViewportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseViewportError(s.to_string());
        let mut parts = s.split(';');
        let page = parts
            .next()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .ok_or_else(invalid)?;
        let mut viewport = Viewport::page(page);

        for part in parts {
            if let Some(rest) = part.strip_prefix("C1:") {
                let (x, y) = rest.split_once(':').ok_or_else(invalid)?;
                viewport.x = x.parse().map_err(|_| invalid())?;
                viewport.y = y.parse().map_err(|_| invalid())?;
                viewport.anchor = Anchor::Center;
                viewport.enabled = true;
            } else if let Some(rest) = part.strip_prefix("C2:") {
                let fields: Vec<&str> = rest.split(':').collect();
                if fields.len() != 3 {
                    return Err(invalid());
                }
                viewport.x = fields[0].parse().map_err(|_| invalid())?;
                viewport.y = fields[1].parse().map_err(|_| invalid())?;
                viewport.anchor = fields[2]
                    .parse::<u8>()
                    .ok()
                    .and_then(Anchor::from_code)
                    .ok_or_else(invalid)?;
                viewport.enabled = true;
            }
        }

        Ok(viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_only_string() {
        let vp = Viewport::page(4);
        assert_eq!(vp.to_string(), "4");
        assert_eq!("4".parse::<Viewport>().unwrap(), vp);
    }

    #[test]
    fn test_positioned_string() {
        let vp = Viewport::at(2, 0.25, 0.5, Anchor::TopLeft);
        assert_eq!(vp.to_string(), "2;C2:0.25:0.5:2");
        assert_eq!(vp.to_string().parse::<Viewport>().unwrap(), vp);
    }

    #[test]
    fn test_legacy_form() {
        let vp: Viewport = "7;C1:0.1:0.9".parse().unwrap();
        assert_eq!(vp, Viewport::at(7, 0.1, 0.9, Anchor::Center));
    }

    #[test]
    fn test_invalid_strings() {
        assert!("".parse::<Viewport>().is_err());
        assert!("x;C2:0:0:1".parse::<Viewport>().is_err());
        assert!("1;C2:0:0:9".parse::<Viewport>().is_err());
        assert!("1;C2:0:0".parse::<Viewport>().is_err());
    }
}
