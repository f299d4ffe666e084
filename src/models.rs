use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Category keys the dashboard knows about. Records may carry others; the
/// aggregator handles unrecognized keys with a capitalized fallback name.
pub const TECH_CATEGORIES: [&str; 6] = [
    "frontend",
    "backend",
    "database",
    "deployment",
    "aiTools",
    "other",
];

/// Per-website mapping of technology category to a list of technology
/// names. Category values stay raw JSON so malformed entries (non-array
/// categories, non-string technologies) survive loading and get skipped
/// during aggregation instead of failing the whole file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TechStackInfo {
    #[serde(default)]
    pub source: String,
    #[serde(flatten)]
    pub categories: Map<String, Value>,
}

impl TechStackInfo {
    /// Default substituted for records missing a tech stack: every known
    /// category list empty, source timestamp = load time.
    pub fn empty_now() -> Self {
        let mut categories = Map::new();
        for key in TECH_CATEGORIES {
            categories.insert(key.to_string(), Value::Array(Vec::new()));
        }
        Self {
            source: Utc::now().to_rfc3339(),
            categories,
        }
    }
}

// Treats an explicit `"techStack": null` the same as an omitted field.
fn deserialize_tech_stack<'de, D>(deserializer: D) -> Result<TechStackInfo, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TechStackInfo>::deserialize(deserializer)?.unwrap_or_else(TechStackInfo::empty_now))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Website {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub screenshot: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub favicon: Option<String>,
    #[serde(default)]
    pub requires_auth: bool,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(
        default = "TechStackInfo::empty_now",
        deserialize_with = "deserialize_tech_stack"
    )]
    pub tech_stack: TechStackInfo,
}

/// Stored and retrieved as-is; never validated against a remote system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationCredentials {
    pub website_id: String,
    pub auth_method: String,
    #[serde(default)]
    pub credentials: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    pub website_id: String,
    #[serde(default)]
    pub has_favicon: bool,
    #[serde(default)]
    pub has_logo: bool,
    #[serde(default)]
    pub has_screenshot: bool,
    #[serde(default)]
    pub favicon_path: Option<String>,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub screenshot_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TechCategorySummary {
    pub name: String,
    pub count: usize,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TechStackSummary {
    pub total_websites: usize,
    pub total_technologies: usize,
    /// Keyed by raw category name (e.g. `aiTools`), not display name.
    pub categories: BTreeMap<String, TechCategorySummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_website_deserializes_camel_case() {
        let raw = json!({
            "id": "site-1",
            "name": "Example",
            "url": "https://example.com",
            "description": "An example site",
            "requiresAuth": true,
            "lastUpdated": "2025-06-01T12:00:00Z",
            "techStack": {
                "source": "2025-06-01T12:00:00Z",
                "frontend": ["React"],
                "backend": ["Rust"]
            }
        });

        let site: Website = serde_json::from_value(raw).unwrap();
        assert_eq!(site.id, "site-1");
        assert!(site.requires_auth);
        assert!(site.last_updated.is_some());
        assert_eq!(
            site.tech_stack.categories.get("frontend"),
            Some(&json!(["React"]))
        );
    }

    #[test]
    fn test_missing_tech_stack_gets_default() {
        let raw = json!({
            "id": "site-2",
            "name": "Bare",
            "url": "https://bare.example"
        });

        let site: Website = serde_json::from_value(raw).unwrap();
        assert!(!site.tech_stack.source.is_empty());
        assert_eq!(site.tech_stack.categories.len(), TECH_CATEGORIES.len());
        for key in TECH_CATEGORIES {
            assert_eq!(
                site.tech_stack.categories.get(key),
                Some(&json!([])),
                "category {key} should default to an empty list"
            );
        }
    }

    #[test]
    fn test_null_tech_stack_gets_default() {
        let raw = json!({
            "id": "site-3",
            "name": "Null stack",
            "url": "https://null.example",
            "techStack": null
        });

        let site: Website = serde_json::from_value(raw).unwrap();
        assert!(!site.tech_stack.source.is_empty());
        assert_eq!(site.tech_stack.categories.get("other"), Some(&json!([])));
    }

    #[test]
    fn test_website_serializes_camel_case() {
        let site = Website {
            id: "site-1".to_string(),
            name: "Example".to_string(),
            url: "https://example.com".to_string(),
            description: String::new(),
            screenshot: None,
            logo: None,
            favicon: Some("/assets/favicon.ico".to_string()),
            requires_auth: false,
            last_updated: None,
            tech_stack: TechStackInfo::empty_now(),
        };

        let value = serde_json::to_value(&site).unwrap();
        assert!(value.get("requiresAuth").is_some());
        assert!(value.get("techStack").is_some());
        assert_eq!(value["favicon"], json!("/assets/favicon.ico"));
    }

    #[test]
    fn test_credentials_are_opaque() {
        let raw = json!({
            "websiteId": "site-1",
            "authMethod": "basic",
            "credentials": {"username": "admin", "password": "hunter2"}
        });

        let creds: AuthenticationCredentials = serde_json::from_value(raw).unwrap();
        assert_eq!(creds.auth_method, "basic");
        assert_eq!(creds.credentials["username"], json!("admin"));
    }

    #[test]
    fn test_asset_metadata_defaults() {
        let raw = json!({"websiteId": "site-1"});
        let assets: AssetMetadata = serde_json::from_value(raw).unwrap();
        assert!(!assets.has_favicon);
        assert!(!assets.has_logo);
        assert!(assets.favicon_path.is_none());
    }
}
