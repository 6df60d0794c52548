//! Conversion options shared by every stage of one conversion call

use crate::error::OptionsError;
use crate::reader::is_valid_name;

/// Default ceiling on nesting depth
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 200;
/// Default ceiling on attributes per tag and child elements per tag
pub const DEFAULT_MAX_CHILD_COUNT: usize = 5000;
/// Default ceiling on a single attribute value or text run, in bytes
pub const DEFAULT_MAX_STRING_LENGTH: usize = 20_000_000;
/// Default tag name for a node with no natural name
pub const DEFAULT_ROOT_NAME: &str = "root";
/// Default tag name for array entries with no contextual key
pub const DEFAULT_ITEM_NAME: &str = "item";

/// Limits and naming used while converting
///
/// Options are immutable once built; the setters consume and return the
/// value. Names are checked when they are set, so a conversion never starts
/// with an unusable configuration.
///
/// ```
/// use xmlnode::Options;
/// # fn main() -> Result<(), xmlnode::OptionsError> {
/// let options = Options::default()
///     .with_max_nesting_depth(64)
///     .with_root_name("config")?;
/// assert_eq!(options.root_name(), "config");
/// assert!(Options::default().with_item_name("not a name").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    max_nesting_depth: usize,
    max_child_count: usize,
    max_string_length: usize,
    root_name: String,
    item_name: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            max_child_count: DEFAULT_MAX_CHILD_COUNT,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
            root_name: DEFAULT_ROOT_NAME.to_string(),
            item_name: DEFAULT_ITEM_NAME.to_string(),
        }
    }
}

impl Options {
    /// Create options with the default limits and names
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum nesting depth for reading, mapping and serializing
    pub fn max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }

    /// Maximum attributes per tag and child elements per tag
    pub fn max_child_count(&self) -> usize {
        self.max_child_count
    }

    /// Maximum byte length of an attribute value or text run
    pub fn max_string_length(&self) -> usize {
        self.max_string_length
    }

    /// Tag name synthesized for the document root
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Tag name synthesized for anonymous array entries
    pub fn item_name(&self) -> &str {
        &self.item_name
    }

    #[must_use]
    pub fn with_max_nesting_depth(mut self, max_nesting_depth: usize) -> Self {
        self.max_nesting_depth = max_nesting_depth;
        self
    }

    #[must_use]
    pub fn with_max_child_count(mut self, max_child_count: usize) -> Self {
        self.max_child_count = max_child_count;
        self
    }

    #[must_use]
    pub fn with_max_string_length(mut self, max_string_length: usize) -> Self {
        self.max_string_length = max_string_length;
        self
    }

    pub fn with_root_name(mut self, root_name: impl Into<String>) -> Result<Self, OptionsError> {
        self.root_name = checked_name("root_name", root_name.into())?;
        Ok(self)
    }

    pub fn with_item_name(mut self, item_name: impl Into<String>) -> Result<Self, OptionsError> {
        self.item_name = checked_name("item_name", item_name.into())?;
        Ok(self)
    }
}

fn checked_name(field: &'static str, value: String) -> Result<String, OptionsError> {
    if is_valid_name(&value) {
        Ok(value)
    } else {
        Err(OptionsError::InvalidName { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.max_nesting_depth(), 200);
        assert_eq!(options.max_child_count(), 5000);
        assert_eq!(options.max_string_length(), 20_000_000);
        assert_eq!(options.root_name(), "root");
        assert_eq!(options.item_name(), "item");
    }

    #[test]
    fn test_numeric_setters() {
        let options = Options::new()
            .with_max_nesting_depth(3)
            .with_max_child_count(7)
            .with_max_string_length(11);
        assert_eq!(options.max_nesting_depth(), 3);
        assert_eq!(options.max_child_count(), 7);
        assert_eq!(options.max_string_length(), 11);
    }

    #[test]
    fn test_name_setters_accept_valid_names() -> Result<(), OptionsError> {
        let options = Options::new()
            .with_root_name("data")?
            .with_item_name("entry")?;
        assert_eq!(options.root_name(), "data");
        assert_eq!(options.item_name(), "entry");

        let options = Options::new().with_root_name("数据")?;
        assert_eq!(options.root_name(), "数据");
        Ok(())
    }

    #[test]
    fn test_name_setters_reject_invalid_names() {
        assert_eq!(
            Options::new().with_root_name(""),
            Err(OptionsError::InvalidName {
                field: "root_name",
                value: String::new(),
            })
        );
        assert!(Options::new().with_item_name("1st").is_err());
        assert!(Options::new().with_item_name("two words").is_err());
        assert!(Options::new().with_root_name("<root>").is_err());
    }

    #[test]
    fn test_rejected_name_leaves_nothing_half_set() {
        let result = Options::new().with_max_nesting_depth(5).with_root_name(" ");
        assert!(result.is_err());
    }
}
