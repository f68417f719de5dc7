//! Export targets for generated palettes.
//!
//! Passed in by the caller like a [`PatternSource`](crate::PatternSource):
//! the binary writes JSON to stdout or a file, tests collect into memory.

use std::io::Write;

use crate::error::Result;
use crate::request::GeneratedPalette;

/// Somewhere generated palettes can go.
pub trait Exporter {
    /// Hand over a finished set of palettes.
    ///
    /// # Errors
    ///
    /// Serialization or write failures.
    fn export(&mut self, palettes: &[GeneratedPalette]) -> Result<()>;
}

/// Pretty-printed JSON: an object for a single palette, an array otherwise.
#[derive(Debug)]
pub struct JsonExporter<W: Write> {
    writer: W,
}

impl<W: Write> JsonExporter<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Exporter for JsonExporter<W> {
    fn export(&mut self, palettes: &[GeneratedPalette]) -> Result<()> {
        match palettes {
            [single] => serde_json::to_writer_pretty(&mut self.writer, single)?,
            many => serde_json::to_writer_pretty(&mut self.writer, many)?,
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps every exported palette, in order.
#[derive(Debug, Default)]
pub struct MemoryExporter {
    pub palettes: Vec<GeneratedPalette>,
}

impl Exporter for MemoryExporter {
    fn export(&mut self, palettes: &[GeneratedPalette]) -> Result<()> {
        self.palettes.extend_from_slice(palettes);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
