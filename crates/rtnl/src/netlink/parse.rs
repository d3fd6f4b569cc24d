//! Bounds-checked decoding of native-endian netlink wire data.
//!
//! The primitive parsers are winnow combinators over `&[u8]`. [`Cursor`]
//! wraps them for fixed message bodies and turns winnow's backtrack errors
//! into [`Error::Truncated`] carrying the size that was needed.

use winnow::binary::{self, Endianness};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take;
use zerocopy::FromBytes;

use super::error::{Error, Result};

/// Result type for winnow parsers.
pub type PResult<T> = core::result::Result<T, ErrMode<ContextError>>;

fn cut<T>() -> PResult<T> {
    Err(ErrMode::Cut(ContextError::new()))
}

/// Parse a u8.
pub fn parse_u8(input: &mut &[u8]) -> PResult<u8> {
    binary::u8.parse_next(input)
}

/// Parse a u16 in native endian.
pub fn parse_u16_ne(input: &mut &[u8]) -> PResult<u16> {
    binary::u16(Endianness::Native).parse_next(input)
}

/// Parse a u32 in native endian.
pub fn parse_u32_ne(input: &mut &[u8]) -> PResult<u32> {
    binary::u32(Endianness::Native).parse_next(input)
}

/// Parse a u64 in native endian.
pub fn parse_u64_ne(input: &mut &[u8]) -> PResult<u64> {
    binary::u64(Endianness::Native).parse_next(input)
}

/// Parse an i32 in native endian.
pub fn parse_i32_ne(input: &mut &[u8]) -> PResult<i32> {
    binary::i32(Endianness::Native).parse_next(input)
}

/// Parse one netlink attribute and return (raw type, payload).
///
/// Consumes the alignment padding that follows the payload when present;
/// the last attribute of a message may omit it.
pub fn parse_attr<'a>(input: &mut &'a [u8]) -> PResult<(u16, &'a [u8])> {
    let len = parse_u16_ne.parse_next(input)? as usize;
    let attr_type = parse_u16_ne.parse_next(input)?;

    if len < 4 {
        return cut();
    }

    let payload: &[u8] = take(len - 4).parse_next(input)?;

    let padding = nla_align(len) - len;
    let skip = padding.min(input.len());
    let _: &[u8] = take(skip).parse_next(input)?;

    Ok((attr_type, payload))
}

/// Parse a native-endian u32 table filling the whole input.
pub fn parse_u32_table(input: &mut &[u8]) -> PResult<Vec<u32>> {
    if input.is_empty() || input.len() % 4 != 0 {
        return cut();
    }
    winnow::combinator::repeat(1.., parse_u32_ne).parse_next(input)
}

/// Parse a string from a NUL-terminated buffer.
///
/// Everything from the first NUL on is dropped; invalid UTF-8 is replaced.
pub fn parse_string_from_bytes(data: &[u8]) -> String {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    String::from_utf8_lossy(&data[..end]).into_owned()
}

/// Align an attribute length to 4 bytes.
#[inline]
pub const fn nla_align(len: usize) -> usize {
    (len + 3) & !3
}

/// Copy a fixed-layout value out of exactly `size_of::<T>()` bytes.
pub fn exact<T: FromBytes>(data: &[u8]) -> Result<T> {
    T::read_from_bytes(data).map_err(|_| Error::Truncated {
        expected: std::mem::size_of::<T>(),
        actual: data.len(),
    })
}

/// Copy a fixed-layout value out of the front of `data`, ignoring the rest.
pub fn prefix<T: FromBytes>(data: &[u8]) -> Result<T> {
    T::read_from_prefix(data)
        .map(|(value, _)| value)
        .map_err(|_| Error::Truncated {
            expected: std::mem::size_of::<T>(),
            actual: data.len(),
        })
}

/// Advancing reader over a message body.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a [u8],
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    /// Fail with [`Error::Truncated`] unless at least `n` bytes remain.
    pub fn require(&self, n: usize) -> Result<()> {
        if self.input.len() < n {
            return Err(Error::Truncated {
                expected: n,
                actual: self.input.len(),
            });
        }
        Ok(())
    }

    fn run<O>(
        &mut self,
        needed: usize,
        mut parser: impl Parser<&'a [u8], O, ErrMode<ContextError>>,
    ) -> Result<O> {
        let actual = self.input.len();
        parser
            .parse_next(&mut self.input)
            .map_err(|_| Error::Truncated {
                expected: needed,
                actual,
            })
    }

    pub fn u8(&mut self) -> Result<u8> {
        self.run(1, parse_u8)
    }

    pub fn u16(&mut self) -> Result<u16> {
        self.run(2, parse_u16_ne)
    }

    pub fn u32(&mut self) -> Result<u32> {
        self.run(4, parse_u32_ne)
    }

    pub fn i32(&mut self) -> Result<i32> {
        self.run(4, parse_i32_ne)
    }

    /// Take the next `n` bytes.
    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.run(n, take(n))
    }

    /// Copy out a fixed wire struct.
    pub fn read<T: FromBytes>(&mut self) -> Result<T> {
        let data = self.bytes(std::mem::size_of::<T>())?;
        exact(data)
    }

    /// Skip up to `n` padding bytes; a body may end before its padding.
    pub fn skip_padding(&mut self, n: usize) {
        let n = n.min(self.input.len());
        self.input = &self.input[n..];
    }

    /// The unconsumed remainder.
    pub fn rest(self) -> &'a [u8] {
        self.input
    }
}
