use std::net::Ipv4Addr;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::packet::PacketType;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("truncated packet: {needed} bytes needed, {remaining} left")]
    Truncated { needed: usize, remaining: usize },
    #[error("unsupported ospf version {0}")]
    BadVersion(u8),
    #[error("unknown packet type {0}")]
    UnknownType(u8),
    #[error("length field says {declared} bytes but {actual} were received")]
    BadLength { declared: usize, actual: usize },
    #[error("expected a Hello packet, got {0:?}")]
    UnexpectedType(PacketType),
}

/// Fallible decoding: every read checks the remaining length first.
pub trait FromBuf: Sized {
    fn from_buf(buf: &mut impl Buf) -> Result<Self, DecodeError>;
}

/// Decoding of a collection whose element count was read earlier.
pub trait FromBufSized: Sized {
    fn from_buf_sized(buf: &mut impl Buf, count: usize) -> Result<Self, DecodeError>;
}

pub trait ToBytesMut {
    fn put_bytes(&self, buf: &mut BytesMut);

    fn to_bytes_mut(&self) -> BytesMut {
        let mut buf = BytesMut::new();
        self.put_bytes(&mut buf);
        buf
    }
}

pub trait ToBytes {
    fn to_bytes(&self) -> Bytes;
}

impl<T: ToBytesMut> ToBytes for T {
    fn to_bytes(&self) -> Bytes {
        self.to_bytes_mut().freeze()
    }
}

fn ensure(buf: &impl Buf, needed: usize) -> Result<(), DecodeError> {
    if buf.remaining() < needed {
        return Err(DecodeError::Truncated {
            needed,
            remaining: buf.remaining(),
        });
    }
    Ok(())
}

macro_rules! primitive {
    ($t:ty, $get:ident, $put:ident) => {
        impl FromBuf for $t {
            fn from_buf(buf: &mut impl Buf) -> Result<Self, DecodeError> {
                ensure(&*buf, std::mem::size_of::<$t>())?;
                Ok(buf.$get())
            }
        }

        impl ToBytesMut for $t {
            fn put_bytes(&self, buf: &mut BytesMut) {
                buf.$put(*self);
            }
        }
    };
}

primitive!(u8, get_u8, put_u8);
primitive!(u16, get_u16, put_u16);
primitive!(u32, get_u32, put_u32);

impl FromBuf for Ipv4Addr {
    fn from_buf(buf: &mut impl Buf) -> Result<Self, DecodeError> {
        u32::from_buf(buf).map(Ipv4Addr::from)
    }
}

impl ToBytesMut for Ipv4Addr {
    fn put_bytes(&self, buf: &mut BytesMut) {
        buf.put_slice(&self.octets());
    }
}

/// Without a count the vector runs to the end of the buffer.
impl<T: FromBuf> FromBuf for Vec<T> {
    fn from_buf(buf: &mut impl Buf) -> Result<Self, DecodeError> {
        let mut vec = Vec::new();
        while buf.has_remaining() {
            vec.push(T::from_buf(buf)?);
        }
        Ok(vec)
    }
}

impl<T: FromBuf> FromBufSized for Vec<T> {
    fn from_buf_sized(buf: &mut impl Buf, count: usize) -> Result<Self, DecodeError> {
        // the count comes off the wire, so it can't be trusted for preallocation
        let mut vec = Vec::new();
        for _ in 0..count {
            vec.push(T::from_buf(buf)?);
        }
        Ok(vec)
    }
}

impl<T: ToBytesMut> ToBytesMut for Vec<T> {
    fn put_bytes(&self, buf: &mut BytesMut) {
        self.iter().for_each(|item| item.put_bytes(buf));
    }
}
