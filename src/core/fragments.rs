//! Scrape-job fragment generation.
//!
//! Turns a comma-separated list of log path patterns into one scrape-job
//! block per pattern. The concatenated blocks are bound to a single
//! variable and substituted into the agent config template as an opaque
//! chunk; they are never reparsed.

/// Identifier used when a pattern sanitizes down to nothing.
pub const FALLBACK_IDENT: &str = "logs";

/// Label naming the fixed downstream sink every scrape job ships to.
const SINK_LABEL: &str = "loki";

/// Sanitize a raw path pattern into an identifier base.
///
/// Runs of non-alphanumeric characters collapse to a single underscore,
/// leading/trailing underscores are stripped, and the result is
/// lowercased. An empty result falls back to [`FALLBACK_IDENT`].
pub fn sanitize_identifier(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;

    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    if out.is_empty() {
        FALLBACK_IDENT.to_string()
    } else {
        out
    }
}

/// One scrape-job block. The identifier doubles as job name and job
/// label; the path pattern is emitted verbatim.
fn fragment_block(ident: &str, pattern: &str) -> String {
    format!(
        r#"  - job_name: {ident}
    static_configs:
      - targets:
          - localhost
        labels:
          job: {ident}
          sink: {SINK_LABEL}
          __path__: {pattern}
"#
    )
}

/// Generate the scrape-job blocks for a delimited pattern list.
///
/// Splits on commas, trims each entry, and skips empties. Each accepted
/// entry yields one block whose identifier is the sanitized pattern
/// disambiguated with its zero-based ordinal among accepted entries, so
/// two patterns that sanitize alike still get distinct identifiers.
/// An empty or absent list yields exactly one block built from
/// `default_pattern`. Output order matches input order.
pub fn generate(raw_list: Option<&str>, default_pattern: &str) -> String {
    let mut blocks = String::new();
    let mut accepted = 0usize;

    if let Some(raw_list) = raw_list {
        for entry in raw_list.split(',') {
            let pattern = entry.trim();
            if pattern.is_empty() {
                continue;
            }
            let ident = format!("{}_{}", sanitize_identifier(pattern), accepted);
            blocks.push_str(&fragment_block(&ident, pattern));
            accepted += 1;
        }
    }

    if accepted == 0 {
        let ident = format!("{}_0", sanitize_identifier(default_pattern));
        blocks.push_str(&fragment_block(&ident, default_pattern));
    }

    blocks
}
