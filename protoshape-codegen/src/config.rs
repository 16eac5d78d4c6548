//! Configuration for the type model.

/// Options controlling accessor naming and how target types are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    accessor_prefix: String,
    box_messages: bool,
}

impl ModelConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accessor_prefix: "get_".to_string(),
            box_messages: true,
        }
    }

    /// Sets the prefix prepended to a field name to form its getter name.
    #[must_use]
    pub fn accessor_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.accessor_prefix = prefix.into();
        self
    }

    /// Sets whether optional message references render as `Option<Box<T>>`
    /// rather than `Option<T>`.
    #[must_use]
    pub fn box_messages(mut self, enabled: bool) -> Self {
        self.box_messages = enabled;
        self
    }

    /// Returns the getter prefix.
    #[must_use]
    pub fn getter_prefix(&self) -> &str {
        &self.accessor_prefix
    }

    /// Returns true if message pointers are boxed.
    #[must_use]
    pub const fn boxes_messages(&self) -> bool {
        self.box_messages
    }

    /// Builds the getter name for a field or oneof.
    #[must_use]
    pub fn getter_name(&self, name: &str) -> String {
        format!("{}{}", self.accessor_prefix, name)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ModelConfig::default();
        assert_eq!(config.getter_prefix(), "get_");
        assert!(config.boxes_messages());
        assert_eq!(config.getter_name("value"), "get_value");
    }

    #[test]
    fn test_config_builder() {
        let config = ModelConfig::new().accessor_prefix("Get").box_messages(false);
        assert_eq!(config.getter_name("Name"), "GetName");
        assert!(!config.boxes_messages());
    }
}
