use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Division filter keyed on the leading character of an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    #[default]
    All,
    Men,
    Women,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::All, Category::Men, Category::Women];

    /// Identifier prefix, None for All
    pub fn prefix(&self) -> Option<char> {
        match self {
            Category::All => None,
            Category::Men => Some('M'),
            Category::Women => Some('W'),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Category::All => "A",
            Category::Men => "M",
            Category::Women => "W",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Men => "Men",
            Category::Women => "Women",
        }
    }

    /// True when the identifier belongs to this category
    pub fn matches(&self, id: &str) -> bool {
        match self.prefix() {
            None => true,
            Some(p) => id.starts_with(p),
        }
    }

    /// All -> Men -> Women -> All
    pub fn next(&self) -> Self {
        match self {
            Category::All => Category::Men,
            Category::Men => Category::Women,
            Category::Women => Category::All,
        }
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "all" => Ok(Category::All),
            "m" | "men" | "mens" => Ok(Category::Men),
            "w" | "women" | "womens" => Ok(Category::Women),
            other => bail!("Unknown category '{}' (expected A, M or W)", other),
        }
    }
}

impl TryFrom<String> for Category {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.code().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes_and_names() {
        assert_eq!("A".parse::<Category>().unwrap(), Category::All);
        assert_eq!("m".parse::<Category>().unwrap(), Category::Men);
        assert_eq!("Women".parse::<Category>().unwrap(), Category::Women);
        assert!("X".parse::<Category>().is_err());
    }

    #[test]
    fn test_matches_prefix() {
        assert!(Category::Men.matches("M12"));
        assert!(!Category::Men.matches("W12"));
        assert!(Category::Women.matches("W-A"));
        assert!(Category::All.matches("anything"));
    }

    #[test]
    fn test_cycle() {
        assert_eq!(Category::All.next(), Category::Men);
        assert_eq!(Category::Women.next(), Category::All);
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&Category::Women).unwrap();
        assert_eq!(json, "\"W\"");
        let parsed: Category = serde_json::from_str("\"M\"").unwrap();
        assert_eq!(parsed, Category::Men);
    }
}
