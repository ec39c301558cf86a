//! CLASS property values (RFC 5545 §3.8.1.3).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The access classifications defined by RFC 5545.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassificationKind {
    Public,
    Private,
    Confidential,
}

impl ClassificationKind {
    /// Returns the iCalendar text of this classification.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Private => "PRIVATE",
            Self::Confidential => "CONFIDENTIAL",
        }
    }

    /// Matches a CLASS value against the known constants, ignoring case.
    #[must_use]
    pub fn from_text(text: &str) -> Option<Self> {
        [Self::Public, Self::Private, Self::Confidential]
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(text.trim()))
    }
}

/// A CLASS value: one of the known classifications or an extension token
/// (`x-name` / `iana-token`) that must be preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Classification {
    Known(ClassificationKind),
    Extension(String),
}

impl Classification {
    pub const PUBLIC: Self = Self::Known(ClassificationKind::Public);
    pub const PRIVATE: Self = Self::Known(ClassificationKind::Private);
    pub const CONFIDENTIAL: Self = Self::Known(ClassificationKind::Confidential);

    /// Parses a CLASS value. Unknown tokens become `Extension`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        ClassificationKind::from_text(text)
            .map_or_else(|| Self::Extension(text.to_string()), Self::Known)
    }

    /// Returns the iCalendar text of this classification.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(kind) => kind.as_str(),
            Self::Extension(token) => token,
        }
    }
}

impl From<ClassificationKind> for Classification {
    fn from(kind: ClassificationKind) -> Self {
        Self::Known(kind)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Classification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Classification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
