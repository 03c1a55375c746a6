use crate::Term;

/// Selects the wire encoding used for floats.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MinorVersion {
    /// FLOAT_EXT, a fixed-width decimal string.
    Old,
    /// NEW_FLOAT_EXT, an IEEE-754 double.
    New,
}

impl Default for MinorVersion {
    fn default() -> Self {
        MinorVersion::New
    }
}

pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Decode-side behavior toggles. Built once with the chaining setters and
/// handed to a `Decoder`; never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct DecodeConfig {
    pub(crate) atoms_as_strings: bool,
    pub(crate) proplists_as_maps: bool,
    pub(crate) map_keys_as_strings: bool,
    pub(crate) widen_small_ints: bool,
    pub(crate) string_value_keys: Vec<Term>,
}

impl DecodeConfig {
    pub fn new() -> Self {
        Default::default()
    }

    /// Decode atoms as plain strings instead of `Term::Atom`.
    pub fn atoms_as_strings(mut self, enabled: bool) -> Self {
        self.atoms_as_strings = enabled;
        self
    }

    /// Convert a list whose elements are all arity-2 tuples into a map.
    pub fn proplists_as_maps(mut self, enabled: bool) -> Self {
        self.proplists_as_maps = enabled;
        self
    }

    /// Normalize non-string map keys to their string form.
    pub fn map_keys_as_strings(mut self, enabled: bool) -> Self {
        self.map_keys_as_strings = enabled;
        self
    }

    /// Widen SMALL_INTEGER_EXT values to `Term::Int` instead of
    /// keeping them byte-sized.
    pub fn widen_small_ints(mut self, enabled: bool) -> Self {
        self.widen_small_ints = enabled;
        self
    }

    /// Register a map key whose values should be coerced to strings.
    /// The coercion reaches one level into list values.
    pub fn binary_as_string_for_key(mut self, key: Term) -> Self {
        self.string_value_keys.push(key);
        self
    }

    pub(crate) fn wants_string_value(&self, key: &Term) -> bool {
        self.string_value_keys.contains(key)
    }
}

/// Encode-side behavior toggles, built the same way as `DecodeConfig`.
#[derive(Debug, Clone)]
pub struct EncodeConfig {
    pub(crate) strings_as_binaries: bool,
    pub(crate) maps_as_proplists: bool,
    pub(crate) map_keys_as_atoms: bool,
    pub(crate) map_keys_as_strings: bool,
    pub(crate) min_buffer_size: usize,
    pub(crate) minor_version: MinorVersion,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        EncodeConfig {
            strings_as_binaries: false,
            maps_as_proplists: false,
            map_keys_as_atoms: false,
            map_keys_as_strings: false,
            min_buffer_size: DEFAULT_BUFFER_SIZE,
            minor_version: MinorVersion::default(),
        }
    }
}

impl EncodeConfig {
    pub fn new() -> Self {
        Default::default()
    }

    /// Emit strings with the binary tag instead of STRING_EXT.
    pub fn strings_as_binaries(mut self, enabled: bool) -> Self {
        self.strings_as_binaries = enabled;
        self
    }

    /// Emit maps as a nil-terminated list of arity-2 tuples.
    pub fn maps_as_proplists(mut self, enabled: bool) -> Self {
        self.maps_as_proplists = enabled;
        self
    }

    /// Force map keys to atom form, whatever their native shape.
    pub fn map_keys_as_atoms(mut self, enabled: bool) -> Self {
        self.map_keys_as_atoms = enabled;
        self
    }

    /// Force map keys to string form, whatever their native shape.
    pub fn map_keys_as_strings(mut self, enabled: bool) -> Self {
        self.map_keys_as_strings = enabled;
        self
    }

    /// Lower bound on the reusable output buffer capacity. Values below the
    /// 8 KiB default are floored to it.
    pub fn min_buffer_size(mut self, size: usize) -> Self {
        self.min_buffer_size = size.max(DEFAULT_BUFFER_SIZE);
        self
    }

    pub fn minor_version(mut self, version: MinorVersion) -> Self {
        self.minor_version = version;
        self
    }
}
