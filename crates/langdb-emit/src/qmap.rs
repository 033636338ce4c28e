//! Generated C++ source: one `QMap<QString,QString>` per table.

use std::io::Write;

use crate::TableSet;

const HEADER: &str = "// This file is autogenerated by langdb
// Do not edit it

#include <QMap>
#include <QString>

namespace Qutepart {";

const FOOTER: &str = "}  // namespace Qutepart";

/// Writes the tables as C++ source.
pub fn write_qmap<W: Write>(tables: &TableSet<'_>, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{HEADER}")?;

    write_map(
        out,
        "languageNameToXmlFileName",
        tables.names.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )?;
    write_map(
        out,
        "mimeTypeToXmlFileName",
        tables.mime_types.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )?;
    write_map(
        out,
        "extensionToXmlFileName",
        tables.extensions.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )?;
    write_map(
        out,
        "firstLineToXmlFileName",
        tables.first_lines.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )?;
    write_map(
        out,
        "xmlFileNameToIndenter",
        tables.indenters.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )?;

    writeln!(out, "{FOOTER}")
}

fn write_map<'a, W, I>(out: &mut W, name: &str, entries: I) -> std::io::Result<()>
where
    W: Write,
    I: Iterator<Item = (&'a str, &'a str)>,
{
    writeln!(out)?;
    writeln!(out, "QMap<QString,QString> create_{name}() {{")?;
    writeln!(out, "\tQMap<QString,QString> {name};")?;
    for (key, value) in entries {
        writeln!(out, "\t{name}[\"{}\"] = \"{}\";", escape(key), escape(value))?;
    }
    writeln!(out, "\treturn {name};")?;
    writeln!(out, "}}")?;
    writeln!(out, "QMap<QString,QString> {name} = create_{name}();")
}

/// Escapes a value for a C++ string literal.
///
/// Control characters without a short escape are written as three-digit
/// octal escapes, which never absorb a following character.
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_ascii_control() => escaped.push_str(&format!("\\{:03o}", c as u32)),
            _ => escaped.push(c),
        }
    }
    escaped
}
