use crate::languages::rename_destination;
use crate::model::DiffRecord;
use tracing::debug;

/// Why a numstat line produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumstatSkip {
    Blank,
    Incomplete(String),
    Malformed(String),
}

/// Parse one `added<TAB>deleted<TAB>path` line.
///
/// `-` in either count column marks a binary change. Only the added count
/// has to be an integer; an unreadable deleted count is taken as zero.
pub fn parse_numstat_line(line: &str) -> Result<DiffRecord, NumstatSkip> {
    if line.trim().is_empty() {
        return Err(NumstatSkip::Blank);
    }

    let mut parts = line.splitn(3, '\t');
    let (Some(added), Some(deleted), Some(path)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(NumstatSkip::Incomplete(line.to_string()));
    };
    let path = unquote_path(&rename_destination(path));

    if added == "-" || deleted == "-" {
        return Ok(DiffRecord::binary(path));
    }

    let added = added
        .trim()
        .parse::<u64>()
        .map_err(|_| NumstatSkip::Malformed(line.to_string()))?;
    let deleted = deleted.trim().parse::<u64>().unwrap_or(0);

    Ok(DiffRecord::text(path, added, deleted))
}

/// Undo git's C-style quoting of unusual paths, e.g. `"caf\303\251.py"`.
/// Paths without surrounding quotes are returned as they are.
fn unquote_path(path: &str) -> String {
    let Some(inner) = path.strip_prefix('"').and_then(|p| p.strip_suffix('"')) else {
        return path.to_string();
    };

    let raw = inner.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let b = raw[i];
        i += 1;
        if b != b'\\' || i == raw.len() {
            bytes.push(b);
            continue;
        }

        let escaped = raw[i];
        i += 1;
        let decoded = match escaped {
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0c,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'v' => 0x0b,
            b'0'..=b'3' if is_octal_pair(&raw[i..]) => {
                let value = (escaped - b'0') * 64 + (raw[i] - b'0') * 8 + (raw[i + 1] - b'0');
                i += 2;
                value
            }
            other => other,
        };
        bytes.push(decoded);
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

fn is_octal_pair(rest: &[u8]) -> bool {
    matches!(rest, [a, b, ..] if (b'0'..=b'7').contains(a) && (b'0'..=b'7').contains(b))
}

/// Parse a whole `git show --numstat --format=` output, dropping lines that
/// carry no usable counts.
pub fn parse_numstat(output: &str) -> Vec<DiffRecord> {
    output
        .lines()
        .filter_map(|line| match parse_numstat_line(line) {
            Ok(record) => Some(record),
            Err(NumstatSkip::Blank) => None,
            Err(skip) => {
                debug!(?skip, "skipping numstat line");
                None
            }
        })
        .collect()
}
