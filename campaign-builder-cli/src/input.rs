//! Reading and writing the documents the CLI works on.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Ok(DocumentFormat::Json),
            Some("yaml") | Some("yml") => Ok(DocumentFormat::Yaml),
            _ => bail!(
                "{}: expected a .json, .yaml or .yml file",
                path.display()
            ),
        }
    }
}

/// Read a JSON or YAML document. An empty file reads as the type's default.
pub fn read_document<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    let format = DocumentFormat::from_path(path)?;
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(T::default());
    }
    let document = match format {
        DocumentFormat::Json => serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?,
        DocumentFormat::Yaml => serde_yaml_ng::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?,
    };
    Ok(document)
}

/// Write a document back in the format its extension names
pub fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    let content = match DocumentFormat::from_path(path)? {
        DocumentFormat::Json => {
            let mut json = serde_json::to_string_pretty(document)?;
            json.push('\n');
            json
        }
        DocumentFormat::Yaml => serde_yaml_ng::to_string(document)?,
    };
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Decode an `application/x-www-form-urlencoded` body into name/value pairs.
///
/// Pairs may be separated by `&` or by newlines; blank segments are skipped.
pub fn parse_form(body: &str) -> Result<Vec<(String, String)>> {
    body.split(['&', '\n'])
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (name, value) = segment.split_once('=').unwrap_or((segment, ""));
            Ok((decode(name)?, decode(value)?))
        })
        .collect()
}

fn decode(component: &str) -> Result<String> {
    let spaced = component.replace('+', " ");
    let decoded = urlencoding::decode(&spaced)
        .with_context(|| format!("invalid form encoding in '{component}'"))?;
    Ok(decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_builder::Campaign;
    use tempfile::TempDir;

    #[test]
    fn test_parse_form() {
        let pairs = parse_form(
            "fields%5B0%5D%5Bheadline%5D=Hello+world&fields[0][show_hide][]=show_goal\n\nnonce=",
        )
        .unwrap();
        assert_eq!(
            pairs,
            vec![
                ("fields[0][headline]".to_string(), "Hello world".to_string()),
                ("fields[0][show_hide][]".to_string(), "show_goal".to_string()),
                ("nonce".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_documents_round_trip_by_extension() {
        let temp = TempDir::new().unwrap();
        let campaign = Campaign::new("Wells").with_goal(100.0);

        for name in ["c.json", "c.yaml"] {
            let path = temp.path().join(name);
            write_document(&path, &campaign).unwrap();
            let read: Campaign = read_document(&path).unwrap();
            assert_eq!(read, campaign);
        }
    }

    #[test]
    fn test_empty_and_unsupported_documents() {
        let temp = TempDir::new().unwrap();
        let empty = temp.path().join("empty.json");
        fs::write(&empty, "").unwrap();
        let campaign: Campaign = read_document(&empty).unwrap();
        assert_eq!(campaign, Campaign::default());

        let text = temp.path().join("campaign.txt");
        fs::write(&text, "{}").unwrap();
        assert!(read_document::<Campaign>(&text).is_err());
    }
}
