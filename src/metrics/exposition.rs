//! Prometheus text exposition format (version 0.0.4).
//!
//! ```text
//! # HELP elf_binary_section_size The size of the section of the binary.
//! # TYPE elf_binary_section_size gauge
//! elf_binary_section_size{label="heap",unit="byte"} 8192
//! ```
//!
//! Output is byte-for-byte what the Go client library produces for the same
//! gauges: families sorted by name, label pairs sorted by name, samples sorted
//! by label values, and Go's shortest `%g` float formatting.

use std::fmt::Write;

use super::registry::{GaugeVec, Registry};

/// Encodes every non-empty family in the registry.
pub fn encode_text(registry: &Registry) -> String {
    let mut out = String::new();
    for family in registry.families() {
        if family.is_empty() {
            continue;
        }
        encode_family(&mut out, family);
    }
    out
}

fn encode_family(out: &mut String, family: &GaugeVec) {
    let name = family.name();
    let _ = writeln!(out, "# HELP {} {}", name, escape_help(family.help()));
    let _ = writeln!(out, "# TYPE {} gauge", name);

    // Label pairs are written in name order regardless of declaration order.
    let mut order: Vec<usize> = (0..family.label_names().len()).collect();
    order.sort_by(|&a, &b| family.label_names()[a].cmp(&family.label_names()[b]));

    let mut rows: Vec<(Vec<(&str, &str)>, f64)> = family
        .samples()
        .map(|(values, v)| {
            let pairs = order
                .iter()
                .map(|&i| (family.label_names()[i].as_str(), values[i].as_str()))
                .collect();
            (pairs, v)
        })
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    for (pairs, value) in rows {
        out.push_str(name);
        if !pairs.is_empty() {
            out.push('{');
            for (i, (k, v)) in pairs.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let _ = write!(out, "{}=\"{}\"", k, escape_label_value(v));
            }
            out.push('}');
        }
        out.push(' ');
        out.push_str(&format_value(value));
        out.push('\n');
    }
}

/// Formats a sample value.
///
/// Matches Go's `strconv.FormatFloat(v, 'g', -1, 64)` with the special cases
/// the Prometheus client applies: `0`, `1`, `-1`, `NaN`, `+Inf`, `-Inf`.
/// Exponent notation is used when the decimal exponent is below -4 or at
/// least 6, e.g. `1e+06`, `5.36870912e+08`, `1.5e-05`.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v == f64::INFINITY {
        return "+Inf".to_string();
    }
    if v == f64::NEG_INFINITY {
        return "-Inf".to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }
    if v == 1.0 {
        return "1".to_string();
    }
    if v == -1.0 {
        return "-1".to_string();
    }

    // `{:e}` gives the shortest round-trip digits, e.g. "5.36870912e8".
    let sci = format!("{:e}", v);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return v.to_string();
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return v.to_string();
    };

    if (-4..6).contains(&exp) {
        v.to_string()
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.abs())
    }
}

/// Escapes `\`, `"` and newline in a label value.
fn escape_label_value(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

/// Escapes `\` and newline in help text.
fn escape_help(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}
