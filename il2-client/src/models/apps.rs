use il2_keys::DataFieldCast;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// App and action permissions of a key, `#<appId>[,<actionId>...]` on the wire
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppPermissions {
    pub app_id: u64,
    /// Empty means every action of the app
    pub action_ids: Vec<u64>,
}

impl AppPermissions {
    pub fn new(app_id: u64, action_ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            app_id,
            action_ids: action_ids.into_iter().collect(),
        }
    }
}

impl fmt::Display for AppPermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.app_id)?;
        for action in &self.action_ids {
            write!(f, ",{}", action)?;
        }
        Ok(())
    }
}

impl FromStr for AppPermissions {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.trim().trim_start_matches('#');
        let mut parts = body.split(',').map(str::trim);

        let parse = |part: &str| {
            part.parse::<u64>()
                .map_err(|e| format!("invalid app permissions {:?}: {}", s, e))
        };

        let app_id = parse(parts.next().unwrap_or_default())?;
        let action_ids = parts
            .filter(|p| !p.is_empty())
            .map(parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { app_id, action_ids })
    }
}

impl Serialize for AppPermissions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AppPermissions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Inclusive range of IL tag ids, `[start]` or `[start-end]` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LimitedRange {
    pub start: u64,
    pub end: u64,
}

impl LimitedRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub fn single(value: u64) -> Self {
        Self::new(value, value)
    }

    pub fn count(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn contains(&self, value: u64) -> bool {
        self.start <= value && value <= self.end
    }

    pub fn overlaps_with(&self, other: &LimitedRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for LimitedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "[{}]", self.start)
        } else {
            write!(f, "[{}-{}]", self.start, self.end)
        }
    }
}

impl FromStr for LimitedRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.trim().trim_start_matches('[').trim_end_matches(']');
        let parse = |part: &str| {
            part.trim()
                .parse::<u64>()
                .map_err(|e| format!("invalid range {:?}: {}", s, e))
        };
        let range = match body.split_once('-') {
            Some((start, end)) => Self::new(parse(start)?, parse(end)?),
            None => Self::single(parse(body)?),
        };
        if range.end < range.start {
            return Err(format!("invalid range {:?}: end before start", s));
        }
        Ok(range)
    }
}

impl Serialize for LimitedRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LimitedRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Named value of an enumerated data field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFieldEnumeration {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
}

impl DataFieldEnumeration {
    /// Parse the node's concatenated form, `#<id>|<name>|[<description>|]...`
    pub fn parse_list(text: &str) -> Result<Vec<Self>, String> {
        text.split('#')
            .filter(|item| !item.is_empty())
            .map(|item| {
                let mut parts = item.split('|');
                let id = parts
                    .next()
                    .unwrap_or_default()
                    .parse::<u64>()
                    .map_err(|e| format!("invalid enumeration {:?}: {}", item, e))?;
                let name = parts
                    .next()
                    .ok_or_else(|| format!("enumeration {:?} has no name", item))?
                    .to_string();
                let description = parts.next().filter(|d| !d.is_empty()).map(str::to_string);
                Ok(Self {
                    id,
                    name,
                    description,
                })
            })
            .collect()
    }
}

impl fmt::Display for DataFieldEnumeration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}|{}|", self.id, self.name)?;
        if let Some(description) = &self.description {
            write!(f, "{}|", description)?;
        }
        Ok(())
    }
}

mod enumeration_text {
    use super::DataFieldEnumeration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        values: &[DataFieldEnumeration],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let text: String = values.iter().map(|v| v.to_string()).collect();
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<DataFieldEnumeration>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => DataFieldEnumeration::parse_list(&text).map_err(serde::de::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}

/// Field of an app payload data model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<DataFieldCast>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Element type when the field is an array
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_tag_id: Option<u64>,
    #[serde(default, with = "enumeration_text")]
    pub enumeration: Vec<DataFieldEnumeration>,
    /// Enumeration values combine as bit flags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enumeration_as_flags: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deprecated: Option<bool>,
    /// Stored as raw bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_opaque: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub sub_data_fields: Vec<DataField>,
    #[serde(default)]
    pub tag_id: u64,
    #[serde(default)]
    pub version: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataIndexElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descending_order: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataIndex {
    #[serde(default)]
    pub elements: Vec<DataIndexElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_unique: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Payload layout of the records an app stores
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModel {
    #[serde(default)]
    pub data_fields: Vec<DataField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub indexes: Vec<DataIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_name: Option<String>,
    #[serde(default)]
    pub payload_tag_id: u64,
    #[serde(default)]
    pub version: u32,
}

/// App published in the network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterlockApp {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Four-part semantic version
    #[serde(default)]
    pub app_version: String,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub publisher_id: String,
    #[serde(default)]
    pub publisher_name: String,
    #[serde(default)]
    pub data_models: Vec<DataModel>,
    #[serde(rename = "reservedILTagIds", default)]
    pub reserved_il_tag_ids: Vec<LimitedRange>,
    /// Start of validity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
}

/// Apps valid in the node's network
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Apps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default)]
    pub valid_apps: Vec<InterlockApp>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_form() {
        assert_eq!(AppPermissions::new(4, []).to_string(), "#4");
        assert_eq!(AppPermissions::new(4, [1000, 1001]).to_string(), "#4,1000,1001");
    }

    #[test]
    fn parses_node_strings() {
        let parsed: AppPermissions = "#4,1000,1001".parse().unwrap();
        assert_eq!(parsed, AppPermissions::new(4, [1000, 1001]));
        assert_eq!("#2".parse::<AppPermissions>().unwrap(), AppPermissions::new(2, []));
        assert!("#x".parse::<AppPermissions>().is_err());
        assert!("".parse::<AppPermissions>().is_err());
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&vec![AppPermissions::new(8, [500])]).unwrap();
        assert_eq!(json, r##"["#8,500"]"##);
        let back: Vec<AppPermissions> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[0].action_ids, vec![500]);
    }

    #[test]
    fn limited_range_text_form() {
        let range: LimitedRange = "[300-399]".parse().unwrap();
        assert_eq!(range, LimitedRange::new(300, 399));
        assert_eq!(range.count(), 100);
        assert!(range.contains(300) && !range.contains(400));
        assert_eq!(range.to_string(), "[300-399]");
        assert_eq!("[42]".parse::<LimitedRange>().unwrap().to_string(), "[42]");
        assert!("[9-1]".parse::<LimitedRange>().is_err());
        assert!(range.overlaps_with(&LimitedRange::new(390, 500)));
        assert!(!range.overlaps_with(&LimitedRange::single(400)));
    }

    #[test]
    fn apps_read_node_listing() {
        let apps: Apps = serde_json::from_value(serde_json::json!({
            "network": "Minerva",
            "validApps": [{
                "id": 8,
                "name": "JSON Documents",
                "appVersion": "1.0.0.0",
                "description": "Encrypted JSON",
                "publisherId": "Key!abc#SHA1",
                "publisherName": "InterlockLedger",
                "reservedILTagIds": ["[2100-2199]", "[2300]"],
                "start": "2024-01-01T00:00:00+00:00",
                "dataModels": [{
                    "payloadName": "JsonDocument",
                    "payloadTagId": 2100,
                    "version": 1,
                    "dataFields": [{
                        "name": "Kind",
                        "tagId": 10,
                        "cast": "Integer",
                        "enumeration": "#0|Plain|#1|Encrypted|Cipher text|"
                    }]
                }]
            }]
        }))
        .unwrap();

        let app = &apps.valid_apps[0];
        assert_eq!(app.reserved_il_tag_ids[1], LimitedRange::single(2300));
        let field = &app.data_models[0].data_fields[0];
        assert_eq!(field.cast, Some(DataFieldCast::Integer));
        assert_eq!(field.enumeration.len(), 2);
        assert_eq!(field.enumeration[1].description.as_deref(), Some("Cipher text"));

        let back = serde_json::to_value(field).unwrap();
        assert_eq!(back["enumeration"], "#0|Plain|#1|Encrypted|Cipher text|");
    }
}
