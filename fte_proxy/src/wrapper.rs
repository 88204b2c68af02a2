//! Stream de-framer: turns one [`Codec`] into a message-oriented wrapper
//! over any async byte stream.
//!
//! Modeled on `fte/encoder.py`'s `FTESocketWrapper.recv`/`send` push/pop
//! loop, adapted from that raw-byte-stream framing to this crate's
//! bit-oriented record codec: each call to [`FteStream::send_message`]
//! writes exactly one record, and [`FteStream::recv_message`] accumulates
//! bytes until one full record (and any declared AE tail) has arrived.

use fte_bigint::BigUint;
use fte_record::{
    AeadHeader,
    Codec,
};
use std::fmt;
use tokio::io::{
    AsyncRead,
    AsyncReadExt,
    AsyncWrite,
    AsyncWriteExt,
};

/// A length suffix this wrapper appends to every message before encoding,
/// so leading zero-padding introduced when a message is smaller than the
/// language's capacity never obscures the message's real length.
const LEN_SUFFIX_BYTES: usize = 4;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Record(fte_record::Error),
    /// The message, plus its length suffix, doesn't fit in this language's
    /// capacity even with an AE tail.
    MessageTooLarge { len: usize },
    /// The peer closed the stream mid-record.
    UnexpectedEof,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(from: std::io::Error) -> Self {
        Self::Io(from)
    }
}

impl From<fte_record::Error> for Error {
    fn from(from: fte_record::Error) -> Self {
        Self::Record(from)
    }
}

/// Wraps `inner` with one [`Codec`], framing each `send_message`/
/// `recv_message` call as exactly one covertext record.
pub struct FteStream<S, H> {
    inner: S,
    codec: Codec<H>,
    partition: String,
    read_buf: Vec<u8>,
}

impl<S, H> FteStream<S, H>
where
    S: AsyncRead + AsyncWrite + Unpin,
    H: AeadHeader,
{
    pub fn new(inner: S, codec: Codec<H>, partition: String) -> Self {
        Self {
            inner,
            codec,
            partition,
            read_buf: Vec::new(),
        }
    }

    /// Encode `message` as one record and write it to the stream.
    pub async fn send_message(&mut self, message: &[u8]) -> Result<(), Error> {
        let mut body = Vec::with_capacity(message.len() + LEN_SUFFIX_BYTES);
        body.extend_from_slice(message);
        body.extend_from_slice(&(message.len() as u32).to_be_bytes());

        let msb = (body.len() as u64) * 8;
        let payload = BigUint::from_be_bytes(&body);
        let (record, _bits_encoded, remainder) = self.codec.encode(msb, payload, &self.partition)?;
        if !remainder.is_zero() {
            return Err(Error::MessageTooLarge { len: message.len() });
        }

        self.inner.write_all(&record).await?;
        Ok(())
    }

    /// Read and decode the next complete message from the stream, reading
    /// more bytes as needed.
    pub async fn recv_message(&mut self) -> Result<Vec<u8>, Error> {
        loop {
            if self.read_buf.len() >= self.codec.mtu() {
                match self.codec.decode(&self.read_buf, &self.partition) {
                    Ok((bits_decoded, payload, leftover)) => {
                        self.read_buf = leftover;

                        let byte_len = ((bits_decoded + 7) / 8) as usize;
                        let bytes = payload.to_be_bytes_min_len(byte_len);
                        let total = bytes.len();
                        if total < LEN_SUFFIX_BYTES {
                            return Err(Error::Record(fte_record::Error::DecodeFailure(None)));
                        }
                        let mut len_buf = [0u8; LEN_SUFFIX_BYTES];
                        len_buf.copy_from_slice(&bytes[total - LEN_SUFFIX_BYTES ..]);
                        let len = u32::from_be_bytes(len_buf) as usize;
                        let msg_start = total - LEN_SUFFIX_BYTES - len;
                        return Ok(bytes[msg_start .. total - LEN_SUFFIX_BYTES].to_vec());
                    },
                    Err(fte_record::Error::DecodeFailure(Some(
                        fte_record::DecodeReason::AeBytes,
                    ))) => {
                        // Not enough bytes yet for the declared tail; fall
                        // through to read more.
                    },
                    Err(err) => return Err(err.into()),
                }
            }

            let mut chunk = [0u8; 4096];
            let n = self.inner.read(&mut chunk).await?;
            if n == 0 {
                return Err(Error::UnexpectedEof);
            }
            self.read_buf.extend_from_slice(&chunk[.. n]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fte_language::{
        Language,
        LanguageSpec,
        TransitionTable,
    };
    use fte_record::{
        IdentityHeader,
        RecordConfig,
    };
    use std::sync::Arc;
    use tokio::io::duplex;

    /// Full byte-alphabet, fixed length 24: capacity `8*24 - 128 = 64`.
    fn wide_language(allow_ae_bits: bool) -> Arc<Language> {
        let mtu = 24usize;
        let mut dfa = TransitionTable::new(mtu + 1, 0, &[mtu as u32]);
        for q in 0 .. mtu as u32 {
            for byte in 0u16 .. 256 {
                dfa.set(q, byte as u8, q + 1);
            }
        }
        let spec = LanguageSpec {
            mtu,
            fixed_slice: true,
            allow_ae_bits,
        };
        Arc::new(Language::build(spec, Arc::new(dfa)).unwrap())
    }

    #[tokio::test]
    async fn small_message_round_trips_over_a_duplex_stream() {
        let (client_io, server_io) = duplex(4096);

        let mut client = FteStream::new(
            client_io,
            Codec::new(
                wide_language(true),
                IdentityHeader,
                RecordConfig {
                    max_cell_size: 4096,
                },
            ),
            "000".to_string(),
        );
        let mut server = FteStream::new(
            server_io,
            Codec::new(
                wide_language(true),
                IdentityHeader,
                RecordConfig {
                    max_cell_size: 4096,
                },
            ),
            "000".to_string(),
        );

        let send = async {
            client.send_message(b"hello").await.unwrap();
        };
        let recv = async { server.recv_message().await.unwrap() };

        let (_, received) = tokio::join!(send, recv);
        assert_eq!(received, b"hello");
    }

    #[tokio::test]
    async fn message_exceeding_capacity_errors_without_writing() {
        let (client_io, _server_io) = duplex(4096);
        let mut client = FteStream::new(
            client_io,
            Codec::new(
                wide_language(false),
                IdentityHeader,
                RecordConfig {
                    max_cell_size: 4096,
                },
            ),
            "000".to_string(),
        );

        let huge = vec![0xAAu8; 4096];
        let err = client.send_message(&huge).await.unwrap_err();
        assert!(matches!(err, Error::MessageTooLarge { .. }));
    }
}
