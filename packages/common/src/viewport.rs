use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named rendering target for the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    /// Full-width canvas
    Desktop,

    /// 768px canvas
    Tablet,

    /// 375px canvas
    Mobile,
}

impl Viewport {
    pub const ALL: [Viewport; 3] = [Viewport::Desktop, Viewport::Tablet, Viewport::Mobile];

    pub fn as_str(&self) -> &'static str {
        match self {
            Viewport::Desktop => "desktop",
            Viewport::Tablet => "tablet",
            Viewport::Mobile => "mobile",
        }
    }

    /// Suffix used by viewport-specific props (`widthMobile`, `leftTablet`, ...)
    pub fn prop_suffix(&self) -> &'static str {
        match self {
            Viewport::Desktop => "Desktop",
            Viewport::Tablet => "Tablet",
            Viewport::Mobile => "Mobile",
        }
    }

    /// Key of the viewport-specific override for `base` (e.g. `width` → `widthTablet`)
    pub fn prop_key(&self, base: &str) -> String {
        format!("{}{}", base, self.prop_suffix())
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::Desktop
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Viewport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(Viewport::Desktop),
            "tablet" => Ok(Viewport::Tablet),
            "mobile" => Ok(Viewport::Mobile),
            other => Err(format!(
                "Invalid viewport: {}. Use: mobile, tablet, or desktop",
                other
            )),
        }
    }
}
