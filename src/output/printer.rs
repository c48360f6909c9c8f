use std::io::Write;

use anyhow::Result;

use crate::output::RecordSink;
use crate::replay::DecodedRecord;
use crate::value::DecodedValue;
use crate::SEPARATOR;

/// Render an area tag and its values as one line: the area, the separator,
/// then each value, all separated by single spaces.
pub fn render_line(area: &str, values: &[DecodedValue]) -> String {
    let mut line = String::with_capacity(area.len() + SEPARATOR.len() + 1 + values.len() * 8);
    line.push_str(area);
    line.push(' ');
    line.push_str(SEPARATOR);
    for value in values {
        line.push(' ');
        line.push_str(&value.to_string());
    }
    line
}

/// Writes one text line per record.
#[derive(Debug)]
pub struct TextPrinter<W: Write> {
    writer: W,
}

impl<W: Write> TextPrinter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for TextPrinter<W> {
    fn write_record(&mut self, record: &DecodedRecord) -> Result<()> {
        writeln!(self.writer, "{}", record.render())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes one JSON object per line: `{"offset":..,"area":..,"values":[..]}`.
#[derive(Debug)]
pub struct JsonPrinter<W: Write> {
    writer: W,
}

impl<W: Write> JsonPrinter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonPrinter<W> {
    fn write_record(&mut self, record: &DecodedRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
