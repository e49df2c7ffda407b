//! The PROJECT file model.
//!
//! A [`ProjectConfig`] is the durable state of a scaffolded project. Core
//! keys are marshalled in a fixed alphabetical order; plugin-owned extra
//! keys follow as a raw YAML block (never for version 1 projects).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::DomainError;

/// Default location of the project configuration file.
pub const DEFAULT_PATH: &str = "PROJECT";

/// Project version tag for the legacy layout.
pub const VERSION_1: &str = "1";
/// Project version tag for the current layout.
pub const VERSION_2: &str = "2";
/// Project version tag for the alpha layout.
pub const VERSION_3_ALPHA: &str = "3-alpha";

const CORE_KEYS: [&str; 5] = ["domain", "multigroup", "repo", "resources", "version"];

/// Group/Version/Kind triple identifying a scaffolded API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gvk {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl Gvk {
    pub fn new(group: impl Into<String>, version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }
}

impl std::fmt::Display for Gvk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}, Kind={}", self.group, self.version, self.kind)
    }
}

/// Versioned, extensible project configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectConfig {
    /// Project version selecting the scaffolding pipeline.
    pub version: String,
    /// Domain for API groups.
    pub domain: String,
    /// Go module root.
    pub repo: String,
    /// Tracked resources, deduplicated by value.
    pub resources: Vec<Gvk>,
    /// Whether the project lays out APIs per group.
    pub multigroup: bool,
    /// Plugin-private settings; always empty for version 1.
    pub extra_fields: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Serialize)]
struct CoreFields {
    #[serde(skip_serializing_if = "String::is_empty")]
    domain: String,
    #[serde(skip_serializing_if = "is_false")]
    multigroup: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    repo: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    resources: Vec<Gvk>,
    #[serde(skip_serializing_if = "String::is_empty")]
    version: String,
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    version: Option<serde_yaml::Value>,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    repo: Option<String>,
    #[serde(default)]
    resources: Option<Vec<Gvk>>,
    #[serde(default)]
    multigroup: Option<bool>,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_yaml::Value>,
}

impl ProjectConfig {
    /// Create an empty configuration for `version`.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }

    /// `true` for the legacy layout (an unset version counts as `1`).
    pub fn is_v1(&self) -> bool {
        self.version.is_empty() || self.version == VERSION_1
    }

    pub fn is_v2(&self) -> bool {
        self.version == VERSION_2
    }

    pub fn is_v3(&self) -> bool {
        self.version == VERSION_3_ALPHA
    }

    /// Tracks `gvk` unless it is already present. Returns `true` on change.
    ///
    /// Version 1 projects do not track resources.
    pub fn add_resource(&mut self, gvk: Gvk) -> bool {
        if self.is_v1() || self.has_resource(&gvk) {
            return false;
        }
        self.resources.push(gvk);
        true
    }

    /// `true` if `gvk` is tracked. Always `false` for version 1.
    pub fn has_resource(&self, gvk: &Gvk) -> bool {
        !self.is_v1() && self.resources.contains(gvk)
    }

    /// Distinct groups of the tracked resources, in first-seen order.
    pub fn resource_groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = Vec::new();
        for r in &self.resources {
            if !groups.contains(&r.group) {
                groups.push(r.group.clone());
            }
        }
        groups
    }

    /// Store `value` under the plugin-owned `key`.
    pub fn encode_extra_fields<T: Serialize>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), DomainError> {
        if self.is_v1() {
            return Err(DomainError::ExtraFieldsUnsupported);
        }
        let value = serde_yaml::to_value(value).map_err(|e| DomainError::ExtraFieldEncoding {
            key: key.into(),
            reason: e.to_string(),
        })?;
        self.extra_fields.insert(key.to_string(), value);
        Ok(())
    }

    /// Decode the plugin-owned `key`, if present.
    pub fn decode_extra_fields<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, DomainError> {
        if self.is_v1() {
            return Err(DomainError::ExtraFieldsUnsupported);
        }
        self.extra_fields
            .get(key)
            .cloned()
            .map(serde_yaml::from_value)
            .transpose()
            .map_err(|e| DomainError::ExtraFieldEncoding {
                key: key.into(),
                reason: e.to_string(),
            })
    }

    /// Serialize to the on-disk YAML form.
    pub fn marshal(&self) -> Result<Vec<u8>, DomainError> {
        let core = CoreFields {
            domain: self.domain.clone(),
            multigroup: self.multigroup,
            repo: self.repo.clone(),
            resources: self.resources.clone(),
            version: self.version.clone(),
        };
        let mut core_yaml =
            serde_yaml::to_string(&core).map_err(|e| DomainError::MalformedConfig(e.to_string()))?;
        if core_yaml.trim() == "{}" {
            core_yaml.clear();
        }
        let mut out = double_quote_version(&core_yaml);

        if !self.is_v1() {
            let extras: BTreeMap<&String, &serde_yaml::Value> = self
                .extra_fields
                .iter()
                .filter(|(k, _)| !CORE_KEYS.contains(&k.as_str()))
                .collect();
            if !extras.is_empty() {
                let block = serde_yaml::to_string(&extras)
                    .map_err(|e| DomainError::MalformedConfig(e.to_string()))?;
                out.push_str(&block);
            }
        }

        Ok(out.into_bytes())
    }

    /// Parse the on-disk YAML form.
    ///
    /// Decoding is tolerant: a numeric `version` is accepted and a missing
    /// one defaults to `1`. Version 1 configs drop resources and extras.
    pub fn unmarshal(bytes: &[u8]) -> Result<Self, DomainError> {
        let text =
            std::str::from_utf8(bytes).map_err(|e| DomainError::MalformedConfig(e.to_string()))?;
        let raw: RawConfig = if text.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(text).map_err(|e| DomainError::MalformedConfig(e.to_string()))?
        };

        let version = match raw.version {
            None | Some(serde_yaml::Value::Null) => String::new(),
            Some(serde_yaml::Value::String(s)) => s,
            Some(serde_yaml::Value::Number(n)) => n.to_string(),
            Some(other) => {
                return Err(DomainError::MalformedConfig(format!(
                    "unexpected version value {other:?}"
                )));
            }
        };

        let mut config = Self {
            version: if version.is_empty() {
                VERSION_1.to_string()
            } else {
                version
            },
            domain: raw.domain.unwrap_or_default(),
            repo: raw.repo.unwrap_or_default(),
            resources: raw.resources.unwrap_or_default(),
            multigroup: raw.multigroup.unwrap_or_default(),
            extra_fields: raw.extra,
        };

        if config.is_v1() {
            config.resources.clear();
            config.extra_fields.clear();
        }

        Ok(config)
    }
}

/// serde_yaml single-quotes numeric-looking strings; existing PROJECT files
/// carry `version: "2"`, so the top-level line is rewritten to match.
fn double_quote_version(yaml: &str) -> String {
    yaml.lines()
        .map(|line| match line.strip_prefix("version: '").and_then(|v| v.strip_suffix('\'')) {
            Some(value) => format!("version: \"{value}\"\n"),
            None => format!("{line}\n"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v2_config() -> ProjectConfig {
        let mut c = ProjectConfig::new(VERSION_2);
        c.domain = "example.com".into();
        c.repo = "github.com/example/guestbook".into();
        c.add_resource(Gvk::new("ship", "v1beta1", "Frigate"));
        c.add_resource(Gvk::new("crew", "v1", "Captain"));
        c.encode_extra_fields("addon", &BTreeMap::from([("channel", "stable")]))
            .unwrap();
        c
    }

    #[test]
    fn empty_config_marshals_to_nothing() {
        assert!(ProjectConfig::default().marshal().unwrap().is_empty());
    }

    #[test]
    fn marshal_orders_core_keys_then_extras() {
        let text = String::from_utf8(v2_config().marshal().unwrap()).unwrap();
        let domain = text.find("domain:").unwrap();
        let repo = text.find("repo:").unwrap();
        let resources = text.find("resources:").unwrap();
        let version = text.find("\nversion:").unwrap();
        let addon = text.find("addon:").unwrap();
        assert!(domain < repo && repo < resources && resources < version && version < addon);
        assert!(!text.contains("multigroup"));
    }

    #[test]
    fn numeric_version_is_double_quoted() {
        let text = String::from_utf8(v2_config().marshal().unwrap()).unwrap();
        assert!(text.contains("\nversion: \"2\"\n"), "{text}");
        assert!(!text.contains("version: '2'"));
        assert!(text.contains("  version: v1beta1"));
    }

    #[test]
    fn v2_round_trip_is_identity() {
        let c = v2_config();
        let back = ProjectConfig::unmarshal(&c.marshal().unwrap()).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn numeric_version_is_accepted() {
        let c = ProjectConfig::unmarshal(b"domain: example.com\nversion: 2\n").unwrap();
        assert_eq!(c.version, "2");
        assert_eq!(c.domain, "example.com");
    }

    #[test]
    fn missing_version_defaults_to_v1_and_drops_v2_fields() {
        let c = ProjectConfig::unmarshal(
            b"domain: example.com\nresources:\n- group: ship\n  version: v1\n  kind: Frigate\nfoo: bar\n",
        )
        .unwrap();
        assert_eq!(c.version, VERSION_1);
        assert!(c.resources.is_empty());
        assert!(c.extra_fields.is_empty());
    }

    #[test]
    fn add_resource_deduplicates() {
        let mut c = ProjectConfig::new(VERSION_2);
        let gvk = Gvk::new("ship", "v1beta1", "Frigate");
        assert!(!c.has_resource(&gvk));
        assert!(c.add_resource(gvk.clone()));
        assert!(c.has_resource(&gvk));
        assert!(!c.add_resource(gvk));
        assert_eq!(c.resources.len(), 1);
    }

    #[test]
    fn v1_short_circuits() {
        let mut c = ProjectConfig::new(VERSION_1);
        let gvk = Gvk::new("ship", "v1beta1", "Frigate");
        assert!(!c.add_resource(gvk.clone()));
        assert!(!c.has_resource(&gvk));
        assert_eq!(
            c.encode_extra_fields("x", &1),
            Err(DomainError::ExtraFieldsUnsupported)
        );
        assert_eq!(
            c.decode_extra_fields::<i32>("x"),
            Err(DomainError::ExtraFieldsUnsupported)
        );
    }

    #[test]
    fn v1_marshal_skips_extras() {
        let mut c = ProjectConfig::new(VERSION_1);
        c.extra_fields
            .insert("foo".into(), serde_yaml::Value::String("bar".into()));
        let text = String::from_utf8(c.marshal().unwrap()).unwrap();
        assert!(!text.contains("foo"));
    }

    #[test]
    fn extra_fields_decode_typed() {
        let c = v2_config();
        let addon: BTreeMap<String, String> = c.decode_extra_fields("addon").unwrap().unwrap();
        assert_eq!(addon["channel"], "stable");
        assert!(c.decode_extra_fields::<String>("missing").unwrap().is_none());
    }

    #[test]
    fn resource_groups_are_distinct() {
        let mut c = ProjectConfig::new(VERSION_2);
        c.add_resource(Gvk::new("ship", "v1", "Frigate"));
        c.add_resource(Gvk::new("ship", "v1", "Destroyer"));
        c.add_resource(Gvk::new("crew", "v1", "Captain"));
        assert_eq!(c.resource_groups(), vec!["ship", "crew"]);
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        assert!(matches!(
            ProjectConfig::unmarshal(b"domain: [unclosed"),
            Err(DomainError::MalformedConfig(_))
        ));
    }
}
