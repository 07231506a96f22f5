use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use ferrous_outbound_application::ports::{InboundReader, OutboundWriter};
use ferrous_outbound_domain::DomainError;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

const READ_CHUNK_SIZE: usize = 16 * 1024;

/// Inbound stream over any byte reader, typically the read half of an
/// accepted client socket.
pub struct IoInboundReader<R> {
    reader: R,
    buf: BytesMut,
}

impl<R> IoInboundReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: BytesMut::with_capacity(READ_CHUNK_SIZE),
        }
    }
}

#[async_trait]
impl<R> InboundReader for IoInboundReader<R>
where
    R: AsyncRead + Send + Unpin,
{
    async fn read(&mut self) -> Result<Option<Bytes>, DomainError> {
        self.buf.reserve(READ_CHUNK_SIZE);
        let n = self.reader.read_buf(&mut self.buf).await?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(self.buf.split().freeze()))
    }

    fn release(&mut self) {
        debug!("Inbound reader released");
    }
}

/// Outbound stream over any byte writer. Closing drops the writer, which for
/// an owned TCP write half sends FIN to the client.
pub struct IoOutboundWriter<W> {
    writer: Option<W>,
}

impl<W> IoOutboundWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(writer),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }
}

#[async_trait]
impl<W> OutboundWriter for IoOutboundWriter<W>
where
    W: AsyncWrite + Send + Unpin,
{
    async fn write(&mut self, chunk: Bytes) -> Result<(), DomainError> {
        let writer = self.writer.as_mut().ok_or(DomainError::StreamClosed)?;
        writer.write_all(&chunk).await?;
        writer.flush().await?;
        Ok(())
    }

    fn close(&mut self) {
        self.writer = None;
    }
}
