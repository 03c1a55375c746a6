/// First byte of every encoded message.
pub const MAGIC: u8 = 131;

#[allow(dead_code)]
pub mod tag {
    /// Unsigned 8-bit integer
    pub const SMALL_INTEGER_EXT: u8 = 97;
    /// Signed 32-bit integer in big-endian format
    pub const INTEGER_EXT: u8 = 98;
    /// DEPRECATED
    /// Float stored as a 31-byte NUL-padded decimal string
    pub const FLOAT_EXT: u8 = 99;
    /// (num:f64be)
    pub const NEW_FLOAT_EXT: u8 = 70;
    /// (data_len:u8), (is_neg:u8 as bool), (u8)..
    /// B = 256
    /// (d0*B^0 + d1*B^1 + d2*B^2 + ... d(N-1)*B^(n-1))
    pub const SMALL_BIG_EXT: u8 = 110;
    /// (data_len:u32be), (is_neg:u8 as bool), (u8)..
    /// Otherwise same as small
    pub const LARGE_BIG_EXT: u8 = 111;
    /// (len:u16be) name_bytes..
    pub const ATOM_EXT: u8 = 100;
    /// (len:u8) name_bytes..
    pub const SMALL_ATOM_EXT: u8 = 115;
    /// (length:u16be), (chars:u8)..
    pub const STRING_EXT: u8 = 107;
    /// (length:u32be), (data)..
    pub const BINARY_EXT: u8 = 109;
    /// only tag
    pub const NIL_EXT: u8 = 106;
    /// (length:u32be), (elements).., (tail)
    pub const LIST_EXT: u8 = 108;
    /// (arity:u8), elements..
    pub const SMALL_TUPLE_EXT: u8 = 104;
    /// (arity:u32be), elements..
    pub const LARGE_TUPLE_EXT: u8 = 105;
    /// (arity:u32be), (key, value)..
    /// Duplicate keys not allowed.
    pub const MAP_EXT: u8 = 116;
}

pub mod bound {
    /// Largest value carried by SMALL_INTEGER_EXT. Also the small/large
    /// threshold for atoms, tuple arities and bignum byte counts.
    pub const SMALL_INTEGER_MAX: u32 = 255;
    /// Largest byte count carried by STRING_EXT.
    pub const STRING_MAX: usize = 65535;
    /// Fixed width of the FLOAT_EXT payload.
    pub const FLOAT_EXT_LEN: usize = 31;
}
