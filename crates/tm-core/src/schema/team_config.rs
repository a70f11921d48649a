//! Team roster schema

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Persisted team roster
///
/// Stored at `<teams-dir>/{team_name}/config.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamConfig {
    /// Team name (matches directory name)
    pub name: String,

    /// Human-readable team purpose
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unix timestamp in milliseconds when team was created
    pub created_at: u64,

    /// Registered teammates, in registration order
    pub members: Vec<TeamMember>,

    /// Unknown fields for forward compatibility
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// One roster entry in a team's `config.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    /// Teammate name, unique within the team
    pub name: String,

    /// Unix timestamp in milliseconds when the teammate registered
    pub joined_at: u64,

    /// Unknown fields for forward compatibility
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_config_roundtrip_minimal() {
        let json = r#"{
            "name": "ci-fixers",
            "createdAt": 1786525919076,
            "members": []
        }"#;

        let config: TeamConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.name, "ci-fixers");
        assert_eq!(config.created_at, 1786525919076);
        assert!(config.description.is_none());
        assert!(config.members.is_empty());

        let serialized = serde_json::to_string(&config).unwrap();
        let reparsed: TeamConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(config.name, reparsed.name);
    }

    #[test]
    fn test_team_config_roundtrip_with_members() {
        let json = r#"{
            "name": "ci-fixers",
            "description": "Agents investigating the red build",
            "createdAt": 1786525919076,
            "members": [
                {"name": "triage", "joinedAt": 1786525920000},
                {"name": "bisector", "joinedAt": 1786525921000}
            ]
        }"#;

        let config: TeamConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.members.len(), 2);
        assert_eq!(config.members[0].name, "triage");
        assert_eq!(config.members[1].joined_at, 1786525921000);

        let serialized = serde_json::to_string(&config).unwrap();
        let reparsed: TeamConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(reparsed.members.len(), 2);
        assert_eq!(reparsed.members[1].name, "bisector");
    }

    #[test]
    fn test_team_config_preserves_unknown_fields() {
        let json = r#"{
            "name": "ci-fixers",
            "createdAt": 1786525919076,
            "members": [],
            "leadSessionId": "6075f866-f103-4be1-b2e9-8dbf66009eb9"
        }"#;

        let config: TeamConfig = serde_json::from_str(json).unwrap();
        assert!(config.unknown_fields.contains_key("leadSessionId"));

        let serialized = serde_json::to_string(&config).unwrap();
        let reparsed: TeamConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(
            config.unknown_fields.get("leadSessionId"),
            reparsed.unknown_fields.get("leadSessionId")
        );
    }
}
