use byteorder::{BigEndian, ByteOrder};
use log::trace;
use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;
use snafu::Snafu;

use crate::config::DecodeConfig;
use crate::constants::{bound, tag, MAGIC};
use crate::Term;

#[derive(Debug, Snafu)]
pub enum DecodeError {
    #[snafu(display("bad magic byte {}, expected {}", found, MAGIC))]
    BadMagic { found: u8 },

    #[snafu(display("unknown tag byte {} at offset {}", tag, offset))]
    UnknownTag { tag: u8, offset: usize },

    #[snafu(display("input truncated at offset {}", offset))]
    Truncated { offset: usize },

    #[snafu(display("declared size {} exceeds the addressable range", size))]
    SizeExceeded { size: u64 },

    #[snafu(display("malformed float text at offset {}", offset))]
    BadFloat { offset: usize },
}

/// Cursor over the input slice. Every read is bounds-checked; running off
/// the end is `Truncated`, never a panic.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.data.len() - self.pos < len {
            return Truncated { offset: self.pos }.fail();
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    fn read_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(BigEndian::read_i32(self.take(4)?))
    }

    fn read_f64(&mut self) -> Result<f64, DecodeError> {
        Ok(BigEndian::read_f64(self.take(8)?))
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn skip(&mut self, len: usize) {
        self.pos += len;
    }
}

/// Single-pass recursive-descent parser for encoded terms.
///
/// Holds configuration only; all per-call state lives in the call, so one
/// `Decoder` can serve any number of callers through `&self`.
#[derive(Debug, Default)]
pub struct Decoder {
    config: DecodeConfig,
}

impl Decoder {
    pub fn new(config: DecodeConfig) -> Self {
        Decoder { config }
    }

    /// Decode one complete term. All-or-nothing: any failure aborts the
    /// whole call without a partial result.
    pub fn decode_any(&self, data: &[u8]) -> Result<Term, DecodeError> {
        let mut cur = Cursor { data, pos: 0 };
        let magic = cur.read_u8()?;
        if magic != MAGIC {
            return BadMagic { found: magic }.fail();
        }
        self.term(&mut cur)
    }

    fn term(&self, cur: &mut Cursor) -> Result<Term, DecodeError> {
        // Captured before the read so the error can name the offending
        // byte's position even on malformed trailing input.
        let offset = cur.pos;
        let tag_byte = cur.read_u8()?;

        match tag_byte {
            tag::NIL_EXT => {
                trace!("nil_ext");
                Ok(Term::Nil)
            }
            tag::SMALL_INTEGER_EXT => {
                trace!("small_integer_ext");
                let int = cur.read_u8()?;
                if self.config.widen_small_ints {
                    Ok(Term::Int(int as i32))
                } else {
                    Ok(Term::SmallInt(int))
                }
            }
            tag::INTEGER_EXT => {
                trace!("integer_ext");
                Ok(Term::Int(cur.read_i32()?))
            }
            tag::FLOAT_EXT => {
                trace!("float_ext");
                self.old_float(cur)
            }
            tag::NEW_FLOAT_EXT => {
                trace!("new_float_ext");
                Ok(Term::Float(cur.read_f64()?))
            }
            tag::SMALL_BIG_EXT => {
                trace!("small_big_ext");
                let count = cur.read_u8()? as usize;
                self.big(cur, count)
            }
            tag::LARGE_BIG_EXT => {
                trace!("large_big_ext");
                let count = cur.read_u32()?;
                if count > i32::max_value() as u32 {
                    return SizeExceeded { size: count as u64 }.fail();
                }
                self.big(cur, count as usize)
            }
            tag::ATOM_EXT => {
                trace!("atom_ext");
                let len = cur.read_u16()? as usize;
                self.atom(cur, len)
            }
            tag::SMALL_ATOM_EXT => {
                trace!("small_atom_ext");
                let len = cur.read_u8()? as usize;
                self.atom(cur, len)
            }
            tag::STRING_EXT => {
                trace!("string_ext");
                let len = cur.read_u16()? as usize;
                let data = cur.take(len)?;
                Ok(Term::Str(String::from_utf8_lossy(data).into_owned()))
            }
            tag::BINARY_EXT => {
                trace!("binary_ext");
                let len = cur.read_u32()? as usize;
                Ok(Term::Binary(cur.take(len)?.to_owned()))
            }
            tag::LIST_EXT => {
                trace!("list_ext");
                let count = cur.read_u32()?;
                self.list(cur, count)
            }
            tag::SMALL_TUPLE_EXT => {
                trace!("small_tuple_ext");
                let arity = cur.read_u8()? as u32;
                self.tuple(cur, arity)
            }
            tag::LARGE_TUPLE_EXT => {
                trace!("large_tuple_ext");
                let arity = cur.read_u32()?;
                self.tuple(cur, arity)
            }
            tag::MAP_EXT => {
                trace!("map_ext");
                let count = cur.read_u32()?;
                self.map(cur, count)
            }
            unknown => UnknownTag {
                tag: unknown,
                offset,
            }
            .fail(),
        }
    }

    /// FLOAT_EXT payload: a fixed 31-byte decimal string, NUL-padded.
    fn old_float(&self, cur: &mut Cursor) -> Result<Term, DecodeError> {
        let offset = cur.pos;
        let raw = cur.take(bound::FLOAT_EXT_LEN)?;
        let text = String::from_utf8_lossy(raw);
        let trimmed = text.trim_end_matches('\0').trim_end();
        match trimmed.parse::<f64>() {
            Ok(num) => Ok(Term::Float(num)),
            Err(_) => BadFloat { offset }.fail(),
        }
    }

    /// Magnitude bytes are least-significant-first on the wire. The result
    /// narrows to `Long` whenever the magnitude fits `i64::MAX`.
    fn big(&self, cur: &mut Cursor, count: usize) -> Result<Term, DecodeError> {
        let sign = if cur.read_u8()? == 0 {
            Sign::Plus
        } else {
            Sign::Minus
        };
        let int = BigInt::from_bytes_le(sign, cur.take(count)?);

        match int.to_i64() {
            // i64::MIN's magnitude is one past i64::MAX, keep it big.
            Some(small) if small != i64::min_value() => Ok(Term::Long(small)),
            _ => Ok(Term::BigInt(int)),
        }
    }

    fn atom(&self, cur: &mut Cursor, len: usize) -> Result<Term, DecodeError> {
        if len == 0 {
            return Ok(Term::Nil);
        }
        let text = String::from_utf8_lossy(cur.take(len)?).into_owned();

        if text.eq_ignore_ascii_case("true") {
            Ok(Term::Bool(true))
        } else if text.eq_ignore_ascii_case("false") {
            Ok(Term::Bool(false))
        } else if self.config.atoms_as_strings {
            Ok(Term::Str(text))
        } else {
            Ok(Term::Atom(text))
        }
    }

    fn list(&self, cur: &mut Cursor, count: u32) -> Result<Term, DecodeError> {
        let mut elems = Vec::with_capacity(count as usize);
        let mut all_pairs = self.config.proplists_as_maps;

        for _ in 0..count {
            let elem = self.term(cur)?;
            all_pairs = all_pairs && elem.is_kv_pair();
            elems.push(elem);
        }

        // A proper list carries a trailing nil; an improper one carries a
        // tail term instead, which is left for the caller to consume.
        if cur.peek() == Some(tag::NIL_EXT) {
            cur.skip(1);
        }

        if all_pairs {
            let mut pairs = Vec::with_capacity(elems.len());
            for elem in elems {
                if let Term::Tuple(mut kv) = elem {
                    let value = kv.pop();
                    let key = kv.pop();
                    if let (Some(key), Some(value)) = (key, value) {
                        pairs.push((key, value));
                    }
                }
            }
            Ok(Term::Map(pairs))
        } else {
            Ok(Term::List(elems))
        }
    }

    fn tuple(&self, cur: &mut Cursor, arity: u32) -> Result<Term, DecodeError> {
        let mut elems = Vec::with_capacity(arity as usize);
        for _ in 0..arity {
            elems.push(self.term(cur)?);
        }
        Ok(Term::Tuple(elems))
    }

    fn map(&self, cur: &mut Cursor, count: u32) -> Result<Term, DecodeError> {
        let mut pairs = Vec::with_capacity(count as usize);

        for _ in 0..count {
            let key = self.term(cur)?;
            let value = self.term(cur)?;

            if key == Term::Nil {
                continue;
            }

            let key = self.map_key(key);
            let value = self.map_value(&key, value);
            pairs.push((key, value));
        }

        Ok(Term::Map(pairs))
    }

    fn map_key(&self, key: Term) -> Term {
        if !self.config.map_keys_as_strings {
            return key;
        }
        match key {
            Term::Str(_) => key,
            Term::Atom(name) => Term::Str(name),
            Term::Binary(data) => Term::Str(String::from_utf8_lossy(&data).into_owned()),
            other => Term::Str(other.to_string()),
        }
    }

    /// Values under allow-listed keys coerce to strings, reaching one level
    /// into list values but no deeper.
    fn map_value(&self, key: &Term, value: Term) -> Term {
        if !self.config.wants_string_value(key) {
            return value;
        }
        match value {
            Term::Nil => Term::Nil,
            Term::Str(_) => value,
            Term::Binary(data) => Term::Str(String::from_utf8_lossy(&data).into_owned()),
            Term::List(elems) => {
                let coerced = elems
                    .into_iter()
                    .map(|elem| match elem {
                        Term::Str(_) => elem,
                        Term::Binary(data) => {
                            Term::Str(String::from_utf8_lossy(&data).into_owned())
                        }
                        other => Term::Str(other.to_string()),
                    })
                    .collect();
                Term::List(coerced)
            }
            other => Term::Str(other.to_string()),
        }
    }
}
