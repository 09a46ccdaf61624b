//! Chromium "Web Custom MIME Data Format" payloads.
//!
//! Chromium (and Electron apps such as Slack) store custom MIME types on the
//! clipboard as a pickled map:
//!
//! ```text
//! u32 payload_size          bytes after this field
//! u32 entry_count
//! repeated entry_count times:
//!     string16 mime_type
//!     string16 content
//!
//! string16 := u32 char_count (UTF-16 code units) ++ UTF-16LE data ++ zero padding to 4 bytes
//! ```
//!
//! All integers are little-endian.

use super::PayloadError;

/// The MIME type Slack reads its rich-message HTML from.
pub const SLACK_HTML_MIME: &str = "slack/html";

const ALIGNMENT: usize = 4;

/// One named string in the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeEntry {
    pub mime_type: String,
    pub content: String,
}

impl MimeEntry {
    pub fn new(mime_type: &str, content: &str) -> Self {
        MimeEntry {
            mime_type: mime_type.to_string(),
            content: content.to_string(),
        }
    }
}

fn padding(len: usize) -> usize {
    (ALIGNMENT - len % ALIGNMENT) % ALIGNMENT
}

fn to_u32(what: &'static str, len: usize) -> Result<u32, PayloadError> {
    u32::try_from(len).map_err(|_| PayloadError::TooLarge { what, len })
}

fn write_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn write_string16(buf: &mut Vec<u8>, text: &str) -> Result<(), PayloadError> {
    let units: Vec<u16> = text.encode_utf16().collect();
    write_u32(buf, to_u32("string", units.len())?);

    let byte_len = units.len() * 2;
    buf.reserve(byte_len + padding(byte_len));
    for unit in units {
        buf.extend_from_slice(&unit.to_le_bytes());
    }
    buf.resize(buf.len() + padding(byte_len), 0);
    Ok(())
}

/// Serializes the entries, in order, into a pickle container.
pub fn encode(entries: &[MimeEntry]) -> Result<Vec<u8>, PayloadError> {
    let mut payload = Vec::new();
    write_u32(&mut payload, to_u32("entry count", entries.len())?);
    for entry in entries {
        write_string16(&mut payload, &entry.mime_type)?;
        write_string16(&mut payload, &entry.content)?;
    }

    let mut buf = Vec::with_capacity(4 + payload.len());
    write_u32(&mut buf, to_u32("payload", payload.len())?);
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Builds the container Slack expects: a single `slack/html` entry.
pub fn encode_slack_html(html: &str) -> Result<Vec<u8>, PayloadError> {
    encode(&[MimeEntry::new(SLACK_HTML_MIME, html)])
}

struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, needed: usize) -> Result<&'a [u8], PayloadError> {
        let data = self.data;
        let bytes = self
            .offset
            .checked_add(needed)
            .and_then(|end| data.get(self.offset..end))
            .ok_or(PayloadError::Truncated {
                offset: self.offset,
                needed,
                available: self.data.len().saturating_sub(self.offset),
            })?;
        self.offset += needed;
        Ok(bytes)
    }

    fn read_u32(&mut self) -> Result<u32, PayloadError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_string16(&mut self) -> Result<String, PayloadError> {
        let char_count = self.read_u32()? as usize;
        let start = self.offset;
        let byte_len = char_count
            .checked_mul(2)
            .ok_or(PayloadError::TooLarge {
                what: "string",
                len: char_count,
            })?;
        let bytes = self.take(byte_len)?;
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        let text =
            String::from_utf16(&units).map_err(|_| PayloadError::InvalidUtf16 { offset: start })?;
        self.take(padding(byte_len))?;
        Ok(text)
    }
}

/// Decodes a pickle container back into its entries.
///
/// This is the exact inverse of [`encode`]. Trailing bytes past the declared
/// payload size (such as a clipboard NUL terminator) are ignored.
pub fn decode(data: &[u8]) -> Result<Vec<MimeEntry>, PayloadError> {
    let mut reader = Reader { data, offset: 0 };
    let declared = reader.read_u32()? as usize;
    let actual = data.len() - reader.offset;
    if declared > actual {
        return Err(PayloadError::SizeMismatch { declared, actual });
    }
    reader.data = &data[..reader.offset + declared];

    let count = reader.read_u32()?;
    let mut entries = Vec::new();
    for _ in 0..count {
        let mime_type = reader.read_string16()?;
        let content = reader.read_string16()?;
        entries.push(MimeEntry { mime_type, content });
    }

    if reader.offset != reader.data.len() {
        return Err(PayloadError::SizeMismatch {
            declared,
            actual: reader.offset - 4,
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_single_entry_layout() {
        let bytes = encode(&[MimeEntry::new("a/b", "xy")]).unwrap();
        let parts: [&[u8]; 6] = [
            &24u32.to_le_bytes(),
            &1u32.to_le_bytes(),
            &3u32.to_le_bytes(),
            &[b'a', 0, b'/', 0, b'b', 0, 0, 0],
            &2u32.to_le_bytes(),
            &[b'x', 0, b'y', 0],
        ];
        assert_eq!(bytes, parts.concat());
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&[]).unwrap(), [4, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_char_count_is_code_units_not_bytes() {
        let bytes = encode(&[MimeEntry::new("", "🎉é")]).unwrap();
        // payload size, entry count, empty mime type
        let content_count = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);
        assert_eq!(content_count, 3);
        // 6 bytes of UTF-16 plus 2 bytes of padding
        assert_eq!(bytes.len(), 16 + 8);
        assert_eq!(&bytes[22..], &[0, 0]);
    }

    #[test]
    fn test_every_entry_is_aligned() {
        for len in 0..8 {
            let text = "x".repeat(len);
            let bytes = encode(&[MimeEntry::new(&text, &text)]).unwrap();
            assert_eq!(bytes.len() % 4, 0);
        }
    }

    #[test]
    fn test_roundtrip() {
        let entries = vec![
            MimeEntry::new(SLACK_HTML_MIME, "<b>hi</b>"),
            MimeEntry::new("", ""),
            MimeEntry::new("text/x-odd", "a"),
            MimeEntry::new("x/emoji", "𝄞 and 🎉 and 日本"),
        ];
        let bytes = encode(&entries).unwrap();
        assert_eq!(decode(&bytes).unwrap(), entries);
    }

    #[test]
    fn test_decode_ignores_trailing_terminator() {
        let mut bytes = encode_slack_html("<ul></ul>").unwrap();
        bytes.extend_from_slice(&[0, 0]);
        assert_eq!(
            decode(&bytes).unwrap(),
            vec![MimeEntry::new(SLACK_HTML_MIME, "<ul></ul>")]
        );
    }

    #[test]
    fn test_decode_truncated() {
        let bytes = encode_slack_html("content").unwrap();
        assert!(matches!(
            decode(&bytes[..bytes.len() - 4]),
            Err(PayloadError::SizeMismatch { .. })
        ));
        assert!(matches!(decode(&[1, 0]), Err(PayloadError::Truncated { .. })));
    }

    #[test]
    fn test_decode_rejects_unpaired_surrogate() {
        let mut lone = Vec::new();
        write_u32(&mut lone, 1);
        write_u32(&mut lone, 1);
        lone.extend_from_slice(&[0x00, 0xD8, 0, 0]);
        write_u32(&mut lone, 0);
        let mut framed = Vec::new();
        write_u32(&mut framed, lone.len() as u32);
        framed.extend_from_slice(&lone);
        assert_eq!(decode(&framed), Err(PayloadError::InvalidUtf16 { offset: 12 }));
    }
}
