//! Word template filling.
//!
//! A `.docx` file is a zip container of XML parts. The text-bearing parts are
//! rendered with the same `{{key}}` rules as spreadsheet cells, with two
//! differences: whitespace around a key is ignored (`{{ nombre }}`), and an
//! unclosed tag is a template error instead of literal text.
//!
//! Word often splits what the author typed as one tag across several runs
//! (spell-check marks, formatting changes). Markup found inside a tag is
//! dropped before rendering so the tag reads as typed. Every other entry is
//! copied as is.

use crate::error::{Error, Result};
use crate::placeholder;
use crate::record::DataRecord;
use std::io::{Cursor, Read, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

fn is_text_part(name: &str) -> bool {
    let in_word = |prefix: &str| name.starts_with(prefix) && name.ends_with(".xml");
    name == "word/document.xml"
        || name == "word/footnotes.xml"
        || name == "word/endnotes.xml"
        || in_word("word/header")
        || in_word("word/footer")
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn template_error(part: &str, details: String) -> Error {
    Error::Template {
        part: part.to_string(),
        details,
    }
}

/// Length of the run of XML tags at the start of `s`, 0 if there is none.
fn markup_len(s: &str) -> usize {
    let mut len = 0;
    while s[len..].starts_with('<') {
        match s[len..].find('>') {
            Some(end) => len += end + 1,
            None => return 0,
        }
    }
    len
}

fn strip_markup(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let len = markup_len(&rest[open..]);
        if len == 0 {
            rest = &rest[open..];
            break;
        }
        rest = &rest[open + len..];
    }
    out.push_str(rest);
    out
}

/// Drop markup Word put between the two braces of a delimiter (`{<..>{`)
/// and inside a tag (`{{nom<..>bre}}`).
fn merge_split_tags(xml: &str) -> String {
    let bytes = xml.as_bytes();
    let mut joined = String::with_capacity(xml.len());
    let mut last = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'{' || b == b'}' {
            let len = markup_len(&xml[i + 1..]);
            if len > 0 && bytes.get(i + 1 + len) == Some(&b) {
                joined.push_str(&xml[last..=i]);
                last = i + 1 + len;
                i = last;
                continue;
            }
        }
        i += 1;
    }
    joined.push_str(&xml[last..]);

    let mut merged = String::with_capacity(joined.len());
    let mut last = 0;
    for token in placeholder::scan(&joined) {
        if !token.key.contains('<') {
            continue;
        }
        merged.push_str(&joined[last..token.start]);
        merged.push_str("{{");
        merged.push_str(&strip_markup(token.key));
        merged.push_str("}}");
        last = token.end;
    }
    merged.push_str(&joined[last..]);
    merged
}

/// Render one XML part.
pub fn render_part(part: &str, xml: &str, data: &DataRecord) -> Result<String> {
    let xml = merge_split_tags(xml);

    if let Some(offset) = placeholder::find_unclosed(&xml) {
        return Err(template_error(
            part,
            format!("unclosed tag at offset {}", offset),
        ));
    }

    if let Some(token) = placeholder::scan(&xml)
        .into_iter()
        .find(|t| t.key.contains(['<', '>']))
    {
        return Err(template_error(
            part,
            format!("malformed tag at offset {}", token.start),
        ));
    }

    let rendered = placeholder::render_with(&xml, |key| {
        data.get(key.trim())
            .map(|value| escape_xml(&value.to_string()))
    });
    tracing::debug!(
        part,
        resolved = rendered.resolved,
        unresolved = rendered.unresolved,
        "rendered document part"
    );

    Ok(rendered.text.into_owned())
}

fn invalid(e: impl std::fmt::Display) -> Error {
    Error::InvalidDocument(e.to_string())
}

/// Fill a `.docx` template and return the new document bytes.
pub fn fill_docx(template: &[u8], data: &DataRecord) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(template)).map_err(invalid)?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for idx in 0..archive.len() {
        let mut entry = archive.by_index(idx).map_err(invalid)?;
        let name = entry.name().to_string();
        let method = match entry.compression() {
            CompressionMethod::Stored => CompressionMethod::Stored,
            _ => CompressionMethod::Deflated,
        };
        let options: FileOptions<'static, ()> =
            FileOptions::default().compression_method(method);

        if entry.is_dir() {
            writer.add_directory(name, options).map_err(invalid)?;
            continue;
        }

        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).map_err(invalid)?;

        if is_text_part(&name) {
            let xml = String::from_utf8(contents)
                .map_err(|e| template_error(&name, format!("not UTF-8: {}", e)))?;
            contents = render_part(&name, &xml, data)?.into_bytes();
        }

        writer.start_file(name, options).map_err(invalid)?;
        writer.write_all(&contents)?;
    }

    let out = writer.finish().map_err(invalid)?;
    Ok(out.into_inner())
}
