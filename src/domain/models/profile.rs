use std::fmt;
use std::str::FromStr;

/// Ordered list of configuration profiles to overlay on the base config.
///
/// Parsed from a comma-separated string. Each entry is trimmed and
/// lowercased; order is kept exactly as given, duplicates included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileList(Vec<String>);

impl ProfileList {
    /// Parse a comma-separated profile string such as `"staging, Production"`.
    ///
    /// A blank input yields an empty list.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }

        Self(
            raw.split(',')
                .map(|profile| profile.trim().to_lowercase())
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl FromStr for ProfileList {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl<S: Into<String>> FromIterator<S> for ProfileList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|profile| profile.into().trim().to_lowercase())
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a ProfileList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ProfileList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}
