use std::convert::TryInto;

use byteorder::{BigEndian, ByteOrder};
use num_bigint::{BigInt, Sign};
use snafu::Snafu;

use crate::config::{EncodeConfig, MinorVersion};
use crate::constants::{bound, tag, MAGIC};
use crate::Term;

#[derive(Debug, Snafu)]
pub enum EncodeError {
    #[snafu(display("atom of {} bytes does not fit the 2-byte length field", len))]
    AtomTooLong { len: usize },

    #[snafu(display("{} elements do not fit the 4-byte length field", len))]
    LengthOverflow { len: usize },
}

fn len_u32(len: usize) -> Result<u32, EncodeError> {
    match len.try_into() {
        Ok(len) => Ok(len),
        Err(_) => LengthOverflow { len }.fail(),
    }
}

/// Single-pass serializer dispatching on `Term` shape.
///
/// Owns one output buffer that is cleared, not reallocated, between calls.
/// Growth past the configured minimum is the `Vec` doubling policy.
pub struct Encoder {
    config: EncodeConfig,
    buf: Vec<u8>,
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder::new(EncodeConfig::default())
    }
}

impl Encoder {
    pub fn new(config: EncodeConfig) -> Self {
        let buf = Vec::with_capacity(config.min_buffer_size);
        Encoder { config, buf }
    }

    /// Encode one complete term, magic byte included.
    pub fn encode_any(&mut self, term: &Term) -> Result<Vec<u8>, EncodeError> {
        self.reset_buffer();
        self.put_u8(MAGIC);
        self.term(term)?;
        Ok(self.buf.clone())
    }

    fn reset_buffer(&mut self) {
        self.buf.clear();
        let min = self.config.min_buffer_size;
        if self.buf.capacity() < min {
            self.buf.reserve(min);
        }
    }

    fn put_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    fn put_u16(&mut self, val: u16) {
        let mut raw = [0; 2];
        BigEndian::write_u16(&mut raw, val);
        self.buf.extend_from_slice(&raw);
    }

    fn put_u32(&mut self, val: u32) {
        let mut raw = [0; 4];
        BigEndian::write_u32(&mut raw, val);
        self.buf.extend_from_slice(&raw);
    }

    fn put_i32(&mut self, val: i32) {
        let mut raw = [0; 4];
        BigEndian::write_i32(&mut raw, val);
        self.buf.extend_from_slice(&raw);
    }

    fn put_f64(&mut self, val: f64) {
        let mut raw = [0; 8];
        BigEndian::write_f64(&mut raw, val);
        self.buf.extend_from_slice(&raw);
    }

    fn term(&mut self, term: &Term) -> Result<(), EncodeError> {
        match term {
            Term::Nil => {
                self.put_u8(tag::NIL_EXT);
                Ok(())
            }
            Term::Bool(b) => self.atom(if *b { "true" } else { "false" }),
            Term::SmallInt(int) => {
                self.put_u8(tag::SMALL_INTEGER_EXT);
                self.put_u8(*int);
                Ok(())
            }
            Term::Int(int) => {
                self.integer(*int);
                Ok(())
            }
            Term::Long(int) => self.long(*int),
            Term::BigInt(int) => self.big(int),
            Term::Float(num) => {
                self.float(*num);
                Ok(())
            }
            Term::Atom(name) => self.atom(name),
            Term::Str(string) => self.string(string),
            Term::Binary(data) => self.binary(data),
            Term::List(elems) => self.list(elems),
            Term::Tuple(elems) => self.tuple(elems),
            Term::Map(pairs) => self.map(pairs),
        }
    }

    fn integer(&mut self, int: i32) {
        if int >= 0 && int <= bound::SMALL_INTEGER_MAX as i32 {
            self.put_u8(tag::SMALL_INTEGER_EXT);
            self.put_u8(int as u8);
        } else {
            self.put_u8(tag::INTEGER_EXT);
            self.put_i32(int);
        }
    }

    fn long(&mut self, int: i64) -> Result<(), EncodeError> {
        match int.try_into() {
            Ok(small) => {
                self.integer(small);
                Ok(())
            }
            Err(_) => self.big(&BigInt::from(int)),
        }
    }

    /// Sign byte then magnitude bytes, least-significant-first.
    fn big(&mut self, int: &BigInt) -> Result<(), EncodeError> {
        let (sign, bytes) = int.to_bytes_le();

        if bytes.len() <= bound::SMALL_INTEGER_MAX as usize {
            self.put_u8(tag::SMALL_BIG_EXT);
            self.put_u8(bytes.len() as u8);
        } else {
            self.put_u8(tag::LARGE_BIG_EXT);
            let len = len_u32(bytes.len())?;
            self.put_u32(len);
        }

        self.put_u8(if sign == Sign::Minus { 1 } else { 0 });
        self.buf.extend_from_slice(&bytes);
        Ok(())
    }

    fn float(&mut self, num: f64) {
        match self.config.minor_version {
            MinorVersion::Old => {
                self.put_u8(tag::FLOAT_EXT);
                let text = old_float_text(num);
                self.buf.extend_from_slice(&text);
            }
            MinorVersion::New => {
                self.put_u8(tag::NEW_FLOAT_EXT);
                self.put_f64(num);
            }
        }
    }

    fn atom(&mut self, name: &str) -> Result<(), EncodeError> {
        let bytes = name.as_bytes();

        if bytes.len() <= bound::SMALL_INTEGER_MAX as usize {
            self.put_u8(tag::SMALL_ATOM_EXT);
            self.put_u8(bytes.len() as u8);
        } else if bytes.len() <= u16::max_value() as usize {
            self.put_u8(tag::ATOM_EXT);
            self.put_u16(bytes.len() as u16);
        } else {
            return AtomTooLong { len: bytes.len() }.fail();
        }

        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn string(&mut self, string: &str) -> Result<(), EncodeError> {
        let bytes = string.as_bytes();

        if self.config.strings_as_binaries {
            self.binary(bytes)
        } else if bytes.len() <= bound::STRING_MAX {
            self.put_u8(tag::STRING_EXT);
            self.put_u16(bytes.len() as u16);
            self.buf.extend_from_slice(bytes);
            Ok(())
        } else {
            // Too long for the 2-byte length field; fall back to a generic
            // list of byte-sized integers.
            self.byte_list(bytes)
        }
    }

    fn byte_list(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.put_u8(tag::LIST_EXT);
        let len = len_u32(bytes.len())?;
        self.put_u32(len);
        for byte in bytes {
            self.put_u8(tag::SMALL_INTEGER_EXT);
            self.put_u8(*byte);
        }
        self.put_u8(tag::NIL_EXT);
        Ok(())
    }

    fn binary(&mut self, data: &[u8]) -> Result<(), EncodeError> {
        self.put_u8(tag::BINARY_EXT);
        let len = len_u32(data.len())?;
        self.put_u32(len);
        self.buf.extend_from_slice(data);
        Ok(())
    }

    fn tuple(&mut self, elems: &[Term]) -> Result<(), EncodeError> {
        if elems.len() <= bound::SMALL_INTEGER_MAX as usize {
            self.put_u8(tag::SMALL_TUPLE_EXT);
            self.put_u8(elems.len() as u8);
        } else {
            self.put_u8(tag::LARGE_TUPLE_EXT);
            let len = len_u32(elems.len())?;
            self.put_u32(len);
        }
        for elem in elems {
            self.term(elem)?;
        }
        Ok(())
    }

    fn list(&mut self, elems: &[Term]) -> Result<(), EncodeError> {
        self.put_u8(tag::LIST_EXT);
        let len = len_u32(elems.len())?;
        self.put_u32(len);
        for elem in elems {
            self.term(elem)?;
        }
        self.put_u8(tag::NIL_EXT);
        Ok(())
    }

    fn map(&mut self, pairs: &[(Term, Term)]) -> Result<(), EncodeError> {
        let as_proplist = self.config.maps_as_proplists;

        if as_proplist {
            self.put_u8(tag::LIST_EXT);
        } else {
            self.put_u8(tag::MAP_EXT);
        }
        let len = len_u32(pairs.len())?;
        self.put_u32(len);

        for (key, value) in pairs {
            if as_proplist {
                self.put_u8(tag::SMALL_TUPLE_EXT);
                self.put_u8(2);
            }
            self.map_key(key)?;
            self.term(value)?;
        }

        if as_proplist {
            self.put_u8(tag::NIL_EXT);
        }
        Ok(())
    }

    fn map_key(&mut self, key: &Term) -> Result<(), EncodeError> {
        if self.config.map_keys_as_atoms {
            self.atom(&key.to_string())
        } else if self.config.map_keys_as_strings {
            self.string(&key.to_string())
        } else {
            self.term(key)
        }
    }
}

/// FLOAT_EXT payload: scientific notation with 20 fraction digits, padded
/// with NULs to the fixed 31-byte width.
fn old_float_text(num: f64) -> [u8; bound::FLOAT_EXT_LEN] {
    let formatted = format!("{:.20e}", num);

    // The formatter prints a bare exponent ("e1"); the wire format carries
    // an explicit sign and at least two digits ("e+01").
    let text = match formatted.rfind('e') {
        Some(pos) => {
            let exp: i32 = formatted[pos + 1..].parse().unwrap();
            format!("{}e{:+03}", &formatted[..pos], exp)
        }
        None => formatted,
    };

    let mut raw = [0u8; bound::FLOAT_EXT_LEN];
    raw[..text.len()].copy_from_slice(text.as_bytes());
    raw
}
