//! Knobs shared by the `Encoder` and the `Decoder`. A `Config` only states the rules; both sides enforce them.

/// Which values are accepted as map keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    /// Keys must be booleans, integers, floats, strings or binary data, so that a map can always be turned into a hash
    /// based container. Nil, arrays and maps are refused.
    #[default]
    Scalar,
    /// Any value is a valid key, as the wire format itself permits
    Any,
}

/// What the decoder does with bytes following the first complete value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trailing {
    /// Leave them unread; the consumed length is still reported
    #[default]
    Ignore,
    /// Fail with `DecodeError::Trailing`
    Reject,
}

/// Containers nested deeper than this are refused by the decoder unless configured otherwise
pub const DEFAULT_MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub key_policy: KeyPolicy,
    pub trailing: Trailing,
    /// Only consulted while decoding, encoding recurses as deep as the value does
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { key_policy: KeyPolicy::default(), trailing: Trailing::default(), max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl Config {

    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn key_policy(mut self, key_policy: KeyPolicy) -> Self {
        self.key_policy = key_policy;
        self
    }

    pub fn trailing(mut self, trailing: Trailing) -> Self {
        self.trailing = trailing;
        self
    }

    /// Whether `key` may appear in key position of a map
    #[inline]
    pub(crate) fn accepts_key(&self, key: &crate::Value) -> bool {
        match self.key_policy {
            KeyPolicy::Scalar => key.is_scalar(),
            KeyPolicy::Any    => true,
        }
    }

}
