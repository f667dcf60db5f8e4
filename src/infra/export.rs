// ============================================================
// Layer 6 — Translation Export
// ============================================================
// Writes the translated validation set in every format the
// downstream tooling reads:
//
//   translations.json         { "<id>": "<text>", ... }  (UTF-8)
//   translations.csv          id,translated               (UTF-8)
//   translations.jsonl        {"id": .., "translated": ..} per line
//   translations_ascii.csv    as above, non-ASCII → \uXXXX
//   translations_ascii.jsonl  as above, non-ASCII → \uXXXX
//
// Characters outside the BMP are escaped as UTF-16 surrogate
// pairs, which keeps the ASCII JSON-lines file valid JSON.

use anyhow::{anyhow, Context, Result};
use std::{collections::BTreeMap, fmt::Write as _, fs, path::PathBuf};

pub struct TranslationExporter {
    dir: PathBuf,
}

impl TranslationExporter {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    /// Write all five files; returns their paths.
    pub fn write_all(&self, translations: &BTreeMap<String, String>) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let json = serde_json::to_string_pretty(translations)?;
        let outputs = [
            ("translations.json", json),
            ("translations.csv", to_csv(translations, false)?),
            ("translations_ascii.csv", to_csv(translations, true)?),
            ("translations.jsonl", to_jsonl(translations, false)?),
            ("translations_ascii.jsonl", to_jsonl(translations, true)?),
        ];

        let mut written = Vec::with_capacity(outputs.len());
        for (name, body) in outputs {
            let path = self.dir.join(name);
            fs::write(&path, body)
                .with_context(|| format!("Cannot write '{}'", path.display()))?;
            written.push(path);
        }

        tracing::info!(
            "Exported {} translations to '{}'",
            translations.len(),
            self.dir.display()
        );
        Ok(written)
    }
}

/// Replace every non-ASCII char with `\uXXXX` (UTF-16 code units).
pub fn escape_non_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                // Writing to a String cannot fail.
                let _ = write!(out, "\\u{:04x}", unit);
            }
        }
    }
    out
}

fn to_csv(translations: &BTreeMap<String, String>, ascii: bool) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["id", "translated"])?;
    for (id, text) in translations {
        let text = if ascii { escape_non_ascii(text) } else { text.clone() };
        writer.write_record([id.as_str(), text.as_str()])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Cannot flush CSV: {e}"))?;
    Ok(String::from_utf8(bytes)?)
}

fn to_jsonl(translations: &BTreeMap<String, String>, ascii: bool) -> Result<String> {
    let mut out = String::new();
    for (id, text) in translations {
        let line = serde_json::to_string(&serde_json::json!({ "id": id, "translated": text }))?;
        out.push_str(&if ascii { escape_non_ascii(&line) } else { line });
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BTreeMap<String, String> {
        let mut m = BTreeMap::new();
        m.insert("1".to_string(), "হ্যালো".to_string());
        m.insert("2".to_string(), "hi, \"friend\"".to_string());
        m
    }

    #[test]
    fn test_escape_non_ascii() {
        assert_eq!(escape_non_ascii("abc"), "abc");
        assert_eq!(escape_non_ascii("হ"), "\\u09b9");
        assert_eq!(escape_non_ascii("😀"), "\\ud83d\\ude00");
    }

    #[test]
    fn test_csv_quotes_fields() {
        let csv = to_csv(&sample(), false).unwrap();
        assert_eq!(csv, "id,translated\n1,হ্যালো\n2,\"hi, \"\"friend\"\"\"\n");
        assert!(to_csv(&sample(), true).unwrap().is_ascii());
    }

    #[test]
    fn test_csv_round_trips_multiline_text() {
        let mut m = BTreeMap::new();
        m.insert("a".to_string(), "line one,\n\"line\" two".to_string());
        m.insert("b".to_string(), "শুভ সকাল".to_string());

        let body = to_csv(&m, false).unwrap();
        let mut reader = csv::Reader::from_reader(body.as_bytes());
        assert_eq!(reader.headers().unwrap().iter().collect::<Vec<_>>(), vec!["id", "translated"]);
        let rows: Vec<(String, String)> = reader
            .records()
            .map(|r| {
                let r = r.unwrap();
                (r[0].to_string(), r[1].to_string())
            })
            .collect();
        assert_eq!(rows, m.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_ascii_jsonl_is_valid_json() {
        let body = to_jsonl(&sample(), true).unwrap();
        assert!(body.is_ascii());
        let first: serde_json::Value = serde_json::from_str(body.lines().next().unwrap()).unwrap();
        assert_eq!(first["id"], "1");
        assert_eq!(first["translated"], "হ্যালো");
    }

    #[test]
    fn test_write_all_creates_every_file() {
        let dir = std::env::temp_dir().join(format!("nmt_export_{}", std::process::id()));
        fs::remove_dir_all(&dir).ok();

        let paths = TranslationExporter::new(dir.to_string_lossy().to_string())
            .write_all(&sample())
            .unwrap();
        assert_eq!(paths.len(), 5);
        assert!(paths.iter().all(|p| p.exists()));

        let json: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(dir.join("translations.json")).unwrap()).unwrap();
        assert_eq!(json, sample());
        fs::remove_dir_all(&dir).ok();
    }
}
