//! Pretty-printer for [`Node`] trees.
//!
//! Output matches the layout consumers of Bedrock geometry files expect:
//! objects and arrays of containers are indented two spaces per level, while
//! an array whose first child is a scalar (or that is empty) is written on a
//! single line with no whitespace, e.g. `"pivot": [0,0,0]`.

use crate::node::Node;

const INDENT: &str = "  ";

pub fn to_pretty_string(node: &Node) -> String {
    let mut out = String::new();
    write_indented(&mut out, node, 0);
    out
}

fn write_indented(out: &mut String, node: &Node, depth: usize) {
    match node {
        Node::Object(entries) if !entries.is_empty() => {
            out.push('{');
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, depth + 1);
                write_string(out, key);
                out.push_str(": ");
                write_indented(out, value, depth + 1);
            }
            newline(out, depth);
            out.push('}');
        }
        Node::Array(items) if items.first().is_some_and(Node::is_container) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, depth + 1);
                write_indented(out, item, depth + 1);
            }
            newline(out, depth);
            out.push(']');
        }
        _ => write_inline(out, node),
    }
}

fn write_inline(out: &mut String, node: &Node) {
    match node {
        Node::Object(entries) => {
            out.push('{');
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key);
                out.push(':');
                write_inline(out, value);
            }
            out.push('}');
        }
        Node::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_inline(out, item);
            }
            out.push(']');
        }
        Node::String(s) => write_string(out, s),
        Node::Integer(i) => out.push_str(&i.to_string()),
        Node::Float(f) => write_float(out, *f),
    }
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push_str(&serde_json::Value::from(s).to_string());
}

// Shortest round-trip form, always with a fractional part or exponent.
// Exponents are written as `E` with a sign and at least two digits.
// Non-finite values have no JSON literal and are written as strings.
fn write_float(out: &mut String, value: f32) {
    if value.is_nan() {
        out.push_str("\"NaN\"");
    } else if value.is_infinite() {
        out.push_str(if value > 0.0 {
            "\"Infinity\""
        } else {
            "\"-Infinity\""
        });
    } else {
        let text = format!("{value:?}");
        match text.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                out.push_str(&format!("{mantissa}E{sign}{digits:0>2}"));
            }
            None => out.push_str(&text),
        }
    }
}
