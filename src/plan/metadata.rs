use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Web server used to serve static output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaticServer {
    #[default]
    Caddy,
    Nginx,
}

impl StaticServer {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaticServer::Caddy => "caddy",
            StaticServer::Nginx => "nginx",
        }
    }
}

impl fmt::Display for StaticServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid static server: {0}. Valid options: caddy, nginx")]
pub struct UnknownStaticServer(pub String);

impl FromStr for StaticServer {
    type Err = UnknownStaticServer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "caddy" => Ok(StaticServer::Caddy),
            "nginx" => Ok(StaticServer::Nginx),
            _ => Err(UnknownStaticServer(s.to_string())),
        }
    }
}

/// Typed plan metadata.
///
/// Each supported key is an explicit field; keys this version does not know are
/// dropped on deserialization so newer plan files still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_server: Option<StaticServer>,

    /// SPA mode. Serialized only while active.
    #[serde(
        default,
        skip_serializing_if = "is_false",
        deserialize_with = "deserialize_null_default"
    )]
    pub is_spa: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir_override: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_packages"
    )]
    pub custom_packages: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        *self == Metadata::default()
    }

    pub fn static_server(&self) -> StaticServer {
        self.static_server.unwrap_or_default()
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Treats an explicit `null` like a missing field.
pub(crate) fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_packages<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let packages: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(dedup_packages(packages.unwrap_or_default()))
}

/// Drops duplicates, keeping the first occurrence of each package.
pub fn dedup_packages<I>(packages: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    packages
        .into_iter()
        .filter(|pkg| seen.insert(pkg.clone()))
        .collect()
}
