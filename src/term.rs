use std::fmt::{Display, Formatter};
use std::iter::FromIterator;

use num_bigint::BigInt;

/// A single value in the external term format.
///
/// `Nil` doubles as the empty list and the absence marker, which is how the
/// wire format itself treats tag 106.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Nil,
    Bool(bool),
    SmallInt(u8),
    Int(i32),
    Long(i64),
    BigInt(BigInt),
    Float(f64),
    Atom(String),
    Str(String),
    Binary(Vec<u8>),
    List(Vec<Term>),
    Tuple(Vec<Term>),
    Map(Vec<(Term, Term)>),
}

impl Term {
    pub fn atom<S: Into<String>>(name: S) -> Term {
        Term::Atom(name.into())
    }

    /// True for an arity-2 tuple, the shape a proplist entry must have.
    pub fn is_kv_pair(&self) -> bool {
        match self {
            Term::Tuple(elems) => elems.len() == 2,
            _ => false,
        }
    }
}

/// Textual fallback used when map keys or values are normalized to strings.
impl Display for Term {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Term::Nil => write!(f, "[]"),
            Term::Bool(b) => write!(f, "{}", b),
            Term::SmallInt(int) => write!(f, "{}", int),
            Term::Int(int) => write!(f, "{}", int),
            Term::Long(int) => write!(f, "{}", int),
            Term::BigInt(int) => write!(f, "{}", int),
            Term::Float(num) => write!(f, "{}", num),
            Term::Atom(name) => write!(f, "{}", name),
            Term::Str(string) => write!(f, "{}", string),
            Term::Binary(data) => write!(f, "{}", String::from_utf8_lossy(data)),
            Term::List(elems) => {
                write!(f, "[")?;
                for (idx, elem) in elems.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", elem)?;
                }
                write!(f, "]")
            }
            Term::Tuple(elems) => {
                write!(f, "{{")?;
                for (idx, elem) in elems.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", elem)?;
                }
                write!(f, "}}")
            }
            Term::Map(pairs) => {
                write!(f, "#{{")?;
                for (idx, (key, value)) in pairs.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{} => {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Term {
    fn from(b: bool) -> Term {
        Term::Bool(b)
    }
}
impl From<u8> for Term {
    fn from(int: u8) -> Term {
        Term::SmallInt(int)
    }
}
impl From<i32> for Term {
    fn from(int: i32) -> Term {
        Term::Int(int)
    }
}
impl From<u32> for Term {
    fn from(int: u32) -> Term {
        Term::Long(int as i64)
    }
}
impl From<i64> for Term {
    fn from(int: i64) -> Term {
        Term::Long(int)
    }
}
impl From<f32> for Term {
    fn from(num: f32) -> Term {
        Term::Float(num as f64)
    }
}
impl From<f64> for Term {
    fn from(num: f64) -> Term {
        Term::Float(num)
    }
}
impl From<BigInt> for Term {
    fn from(int: BigInt) -> Term {
        Term::BigInt(int)
    }
}
impl From<&str> for Term {
    fn from(string: &str) -> Term {
        Term::Str(string.to_owned())
    }
}
impl From<String> for Term {
    fn from(string: String) -> Term {
        Term::Str(string)
    }
}
impl From<&[u8]> for Term {
    fn from(data: &[u8]) -> Term {
        Term::Binary(data.to_owned())
    }
}
impl From<Vec<u8>> for Term {
    fn from(data: Vec<u8>) -> Term {
        Term::Binary(data)
    }
}
impl From<Vec<Term>> for Term {
    fn from(elems: Vec<Term>) -> Term {
        Term::List(elems)
    }
}
impl From<Vec<(Term, Term)>> for Term {
    fn from(pairs: Vec<(Term, Term)>) -> Term {
        Term::Map(pairs)
    }
}
impl FromIterator<Term> for Term {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Term {
        Term::List(iter.into_iter().collect())
    }
}
impl FromIterator<(Term, Term)> for Term {
    fn from_iter<I: IntoIterator<Item = (Term, Term)>>(iter: I) -> Term {
        Term::Map(iter.into_iter().collect())
    }
}
