//! Minimal CSV writing for tabular exports
//!
//! Output follows RFC 4180 quoting: fields containing commas, quotes or
//! line breaks are wrapped in double quotes with embedded quotes doubled.

/// Escape a single CSV field
pub fn escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Join header and rows into a CSV document with `\n` line endings
pub fn to_csv(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(rows.len() + 1);
    lines.push(
        header
            .iter()
            .map(|field| escape(field))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        lines.push(
            row.iter()
                .map(|field| escape(field))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain() {
        assert_eq!(escape("hello"), "hello");
        assert_eq!(escape("8.50"), "8.50");
    }

    #[test]
    fn test_escape_special() {
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_to_csv() {
        let header = ["Name", "Dept"];
        let rows = vec![
            vec!["Alice".to_string(), "Engineering".to_string()],
            vec!["Bob, Jr.".to_string(), "Sales".to_string()],
        ];
        let csv = to_csv(&header, &rows);
        assert_eq!(csv, "Name,Dept\nAlice,Engineering\n\"Bob, Jr.\",Sales");
    }

    #[test]
    fn test_to_csv_empty_rows() {
        let csv = to_csv(&["A", "B"], &[]);
        assert_eq!(csv, "A,B");
    }
}
