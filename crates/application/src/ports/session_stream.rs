use async_trait::async_trait;
use bytes::Bytes;
use ferrous_outbound_domain::DomainError;

/// Bytes arriving from the session's originator.
#[async_trait]
pub trait InboundReader: Send {
    /// Next chunk, or `None` once the originator has finished sending.
    async fn read(&mut self) -> Result<Option<Bytes>, DomainError>;

    fn release(&mut self);
}

/// Bytes delivered back toward the session's originator.
#[async_trait]
pub trait OutboundWriter: Send {
    async fn write(&mut self, chunk: Bytes) -> Result<(), DomainError>;

    /// Signals end of session to whoever consumes this stream.
    fn close(&mut self);
}

/// Owning handle over an [`InboundReader`]; releases it exactly once, on drop.
pub struct InboundHandle {
    reader: Box<dyn InboundReader>,
}

impl InboundHandle {
    pub fn new(reader: impl InboundReader + 'static) -> Self {
        Self::from_boxed(Box::new(reader))
    }

    pub fn from_boxed(reader: Box<dyn InboundReader>) -> Self {
        Self { reader }
    }

    pub async fn read(&mut self) -> Result<Option<Bytes>, DomainError> {
        self.reader.read().await
    }
}

impl Drop for InboundHandle {
    fn drop(&mut self) {
        self.reader.release();
    }
}

/// Owning handle over an [`OutboundWriter`]; closes it exactly once, on drop.
pub struct OutboundHandle {
    writer: Box<dyn OutboundWriter>,
}

impl OutboundHandle {
    pub fn new(writer: impl OutboundWriter + 'static) -> Self {
        Self::from_boxed(Box::new(writer))
    }

    pub fn from_boxed(writer: Box<dyn OutboundWriter>) -> Self {
        Self { writer }
    }

    pub async fn write(&mut self, chunk: Bytes) -> Result<(), DomainError> {
        self.writer.write(chunk).await
    }
}

impl Drop for OutboundHandle {
    fn drop(&mut self) {
        self.writer.close();
    }
}

/// The two halves of one proxied session as seen by the dispatcher.
pub struct StreamPair {
    pub input: InboundHandle,
    pub output: OutboundHandle,
}

impl StreamPair {
    pub fn new(input: impl InboundReader + 'static, output: impl OutboundWriter + 'static) -> Self {
        Self {
            input: InboundHandle::new(input),
            output: OutboundHandle::new(output),
        }
    }

    pub fn into_parts(self) -> (InboundHandle, OutboundHandle) {
        (self.input, self.output)
    }
}
