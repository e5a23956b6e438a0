use crate::error::{AmpError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

const FENCE: &str = "---";

/// A record file: typed YAML front-matter plus a free-form markdown body.
#[derive(Debug, Clone)]
pub struct Document<M> {
    pub meta: M,
    pub body: String,
}

/// Split raw file content into (yaml, body) at the front-matter fences.
///
/// Returns `None` when the file does not start with a `---` fence line or the
/// closing fence is missing. The body has its single leading blank line
/// stripped so render/parse round-trips are stable.
pub fn split_front_matter(raw: &str) -> Option<(&str, &str)> {
    let rest = raw.strip_prefix(FENCE)?;
    let rest = rest
        .strip_prefix('\n')
        .or_else(|| rest.strip_prefix("\r\n"))?;
    // Line-by-line scan for the closing fence.
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let yaml = &rest[..offset];
            let mut body = &rest[offset + line.len()..];
            if let Some(b) = body.strip_prefix('\n') {
                body = b;
            } else if let Some(b) = body.strip_prefix("\r\n") {
                body = b;
            }
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}

/// Parse a record file into typed front-matter and body.
pub fn parse<M: DeserializeOwned>(raw: &str, path: &Path) -> Result<Document<M>> {
    let (yaml, body) = split_front_matter(raw).ok_or_else(|| AmpError::MalformedRecord {
        path: path.display().to_string(),
        reason: "missing front-matter fence".to_string(),
    })?;
    let meta: M = serde_yaml::from_str(yaml).map_err(|e| AmpError::MalformedRecord {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(Document {
        meta,
        body: body.to_string(),
    })
}

/// Render front-matter and body back to file content.
pub fn render<M: Serialize>(meta: &M, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(meta)?;
    let mut out = String::with_capacity(yaml.len() + body.len() + 16);
    out.push_str(FENCE);
    out.push('\n');
    out.push_str(&yaml);
    if !yaml.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(FENCE);
    out.push('\n');
    if !body.is_empty() {
        out.push('\n');
        out.push_str(body);
        if !body.ends_with('\n') {
            out.push('\n');
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Meta {
        title: String,
        #[serde(default)]
        done: bool,
    }

    #[test]
    fn split_basic() {
        let raw = "---\ntitle: Buy milk\n---\n\nRemember oat milk.\n";
        let (yaml, body) = split_front_matter(raw).unwrap();
        assert_eq!(yaml, "title: Buy milk\n");
        assert_eq!(body, "Remember oat milk.\n");
    }

    #[test]
    fn split_requires_leading_fence() {
        assert!(split_front_matter("title: no fence\n").is_none());
        assert!(split_front_matter("").is_none());
    }

    #[test]
    fn split_requires_closing_fence() {
        assert!(split_front_matter("---\ntitle: x\n").is_none());
    }

    #[test]
    fn split_handles_crlf() {
        let raw = "---\r\ntitle: x\r\n---\r\nbody\r\n";
        let (yaml, body) = split_front_matter(raw).unwrap();
        assert_eq!(yaml, "title: x\r\n");
        assert_eq!(body, "body\r\n");
    }

    #[test]
    fn body_may_contain_fences() {
        let raw = "---\ntitle: x\n---\n\nintro\n---\nnot front-matter\n";
        let (_, body) = split_front_matter(raw).unwrap();
        assert!(body.contains("not front-matter"));
    }

    #[test]
    fn parse_render_roundtrip() {
        let meta = Meta {
            title: "Call dentist".to_string(),
            done: false,
        };
        let raw = render(&meta, "Ask about the Tuesday slot.").unwrap();
        let doc: Document<Meta> = parse(&raw, std::path::Path::new("a.md")).unwrap();
        assert_eq!(doc.meta, meta);
        assert_eq!(doc.body, "Ask about the Tuesday slot.\n");
    }

    #[test]
    fn render_empty_body_has_no_trailing_blank() {
        let meta = Meta {
            title: "x".to_string(),
            done: true,
        };
        let raw = render(&meta, "").unwrap();
        assert!(raw.ends_with("---\n"));
        let doc: Document<Meta> = parse(&raw, std::path::Path::new("a.md")).unwrap();
        assert_eq!(doc.body, "");
    }

    #[test]
    fn parse_reports_path_on_bad_yaml() {
        let raw = "---\n: [broken\n---\n";
        let err = parse::<Meta>(raw, std::path::Path::new("users/a/inbox/x.md")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("users/a/inbox/x.md"), "got: {msg}");
    }
}
