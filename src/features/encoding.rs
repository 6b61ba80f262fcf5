use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use std::io::{self, Write};

/// JSON layout the classifier was trained on: `", "` and `": "` separators
/// and ASCII-only output with `\uXXXX` escapes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FeatureJsonFormatter;

impl Formatter for FeatureJsonFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    /// Integer literals are kept verbatim at any size; float literals are
    /// normalized through `f64` so `1E5` reads `100000.0`.
    fn write_number_str<W>(&mut self, writer: &mut W, value: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if !value.contains(|c: char| matches!(c, '.' | 'e' | 'E')) {
            return writer.write_all(value.as_bytes());
        }
        match value.parse::<f64>() {
            Ok(v) if v.is_finite() => self.write_f64(writer, v),
            _ => writer.write_all(value.as_bytes()),
        }
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut start = 0;
        for (idx, ch) in fragment.char_indices() {
            if ch.is_ascii() && ch != '\x7f' {
                continue;
            }
            writer.write_all(fragment[start..idx].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = idx + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Encodes `value` with [`FeatureJsonFormatter`].
pub fn to_feature_json<T>(value: &T) -> serde_json::Result<String>
where
    T: ?Sized + Serialize,
{
    let mut buf = Vec::with_capacity(128);
    let mut serializer = Serializer::with_formatter(&mut buf, FeatureJsonFormatter);
    value.serialize(&mut serializer)?;
    // The formatter only ever emits ASCII.
    String::from_utf8(buf).map_err(serde::ser::Error::custom)
}
