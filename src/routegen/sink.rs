//! Route table output.

use std::io::Write;

use thiserror::Error;

use crate::routegen::table::RouteTable;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Consumer of a finished route table (e.g. the proxy config writer).
pub trait RouteSink {
    fn emit(&mut self, table: &RouteTable) -> Result<(), SinkError>;
}

/// Writes the table as pretty-printed JSON.
#[derive(Debug)]
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RouteSink for JsonSink<W> {
    fn emit(&mut self, table: &RouteTable) -> Result<(), SinkError> {
        serde_json::to_writer_pretty(&mut self.writer, table)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps every emitted table in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub tables: Vec<RouteTable>,
}

impl RouteSink for MemorySink {
    fn emit(&mut self, table: &RouteTable) -> Result<(), SinkError> {
        self.tables.push(table.clone());
        Ok(())
    }
}
