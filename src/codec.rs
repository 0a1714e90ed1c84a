//! Wire codec: length-prefixed UTF-8 frames
//!
//! One logical message per frame: a 2-byte big-endian length prefix
//! (payload byte count) followed by that many UTF-8 bytes. No batching,
//! no envelope, no message-kind tag. The first frame a client sends is
//! its display name; every later frame is chat text or the quit keyword.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::RelayError;

/// Read one frame from the stream.
///
/// Blocks until a full frame arrives or the connection fails. A truncated
/// prefix or payload surfaces as an IO error and is treated by callers
/// exactly like any other read failure.
pub async fn read_frame<R>(reader: &mut R) -> Result<String, RelayError>
where
    R: AsyncRead + Unpin,
{
    let len = reader.read_u16().await?;
    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload).await?;
    Ok(String::from_utf8(payload)?)
}

/// Write one frame to the stream.
///
/// Fails with `FrameTooLong` if the payload cannot be described by the
/// 2-byte prefix.
pub async fn write_frame<W>(writer: &mut W, text: &str) -> Result<(), RelayError>
where
    W: AsyncWrite + Unpin,
{
    let payload = text.as_bytes();
    let len =
        u16::try_from(payload.len()).map_err(|_| RelayError::FrameTooLong(payload.len()))?;
    writer.write_u16(len).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}
