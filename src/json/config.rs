//! Writer and reader configuration.

/// Configuration for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteConfig {
    /// Put each member and element on its own line.
    pub pretty: bool,
    /// Spaces per nesting level when `pretty` is set.
    pub indent: usize,
}

impl WriteConfig {
    /// Single line, no insignificant whitespace.
    pub const COMPACT: Self = Self {
        pretty: false,
        indent: 0,
    };

    /// One member per line, two-space indent.
    pub const PRETTY: Self = Self {
        pretty: true,
        indent: 2,
    };

    /// Set the indent width (implies `pretty`).
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.pretty = true;
        self.indent = indent;
        self
    }
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self::COMPACT
    }
}

/// Default nesting limit for the reader.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration for JSON input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadConfig {
    /// Reject object members the target type does not have.
    pub deny_unknown_fields: bool,
    /// Maximum array/object nesting.
    pub max_depth: usize,
}

impl ReadConfig {
    /// Unknown members are errors.
    pub const STRICT: Self = Self {
        deny_unknown_fields: true,
        max_depth: DEFAULT_MAX_DEPTH,
    };

    /// Unknown members are skipped.
    pub const LENIENT: Self = Self {
        deny_unknown_fields: false,
        max_depth: DEFAULT_MAX_DEPTH,
    };

    /// Set the nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self::STRICT
    }
}
