//! Team and teammate lifecycle, and message routing
//!
//! [`TeamDirectory`] is an explicit context object: the hosting loop
//! constructs one over a base directory and owns it for its lifetime.
//! There is no module-level shared directory, so tests get a hermetic
//! instance over a temp dir and teardown is deterministic.
//!
//! On-disk layout under the base directory:
//!
//! ```text
//! <base>/{team_name}/config.json            - persisted roster
//! <base>/{team_name}/inboxes/{name}.jsonl   - one mailbox per teammate
//! ```

use crate::io::{append_message, drain_messages, pending_count};
use crate::schema::{Message, MessageType, TeamConfig, TeamMember};
use crate::team::error::TeamError;
use chrono::Utc;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Outcome of a team creation attempt.
///
/// Creation is an idempotent guard: asking for a name that already exists
/// reports `AlreadyExists` and mutates nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// A named participant in a team, reachable through its own mailbox.
#[derive(Debug, Clone)]
pub struct Teammate {
    /// Name, unique within the team
    pub name: String,

    /// Owning team
    pub team_name: String,

    /// Location of this teammate's persistent mailbox store
    pub inbox_path: PathBuf,
}

struct Team {
    config: TeamConfig,
    members: HashMap<String, Teammate>,
}

/// Registry of teams and teammates, routing sends to the right mailbox.
///
/// The in-memory roster map is serialized behind one mutex so no caller
/// ever observes a half-created or half-deleted team; message I/O happens
/// outside that lock under the per-mailbox file lock, so two teammates'
/// mailboxes never contend with each other.
pub struct TeamDirectory {
    base_dir: PathBuf,
    teams: Mutex<HashMap<String, Team>>,
}

impl TeamDirectory {
    /// Create a directory rooted at `base_dir`. The directory tree is
    /// created lazily, team by team.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            teams: Mutex::new(HashMap::new()),
        }
    }

    /// Create a directory over the default root, `<home>/.taskmate/teams`.
    pub fn open_default() -> anyhow::Result<Self> {
        Ok(Self::new(crate::home::teams_dir()?))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn lock_teams(&self) -> MutexGuard<'_, HashMap<String, Team>> {
        self.teams.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn team_dir(&self, team: &str) -> PathBuf {
        self.base_dir.join(team)
    }

    /// Create a new, empty team.
    ///
    /// Writes `<base>/<name>/config.json` and the `inboxes/` directory.
    /// Returns [`CreateOutcome::AlreadyExists`] without touching anything
    /// when the name is taken.
    pub fn create_team(&self, name: &str) -> Result<CreateOutcome, TeamError> {
        let mut teams = self.lock_teams();
        if teams.contains_key(name) {
            return Ok(CreateOutcome::AlreadyExists);
        }

        let inbox_dir = self.team_dir(name).join("inboxes");
        fs::create_dir_all(&inbox_dir).map_err(|e| TeamError::Io {
            path: inbox_dir.clone(),
            source: e,
        })?;

        let config = TeamConfig {
            name: name.to_string(),
            description: None,
            created_at: now_ms(),
            members: Vec::new(),
            unknown_fields: HashMap::new(),
        };
        self.write_team_config(&config)?;

        teams.insert(
            name.to_string(),
            Team {
                config,
                members: HashMap::new(),
            },
        );
        tracing::info!(team = name, "team created");
        Ok(CreateOutcome::Created)
    }

    /// Delete a team and every teammate's mailbox store with it.
    ///
    /// The name becomes available for re-creation afterwards.
    pub fn delete_team(&self, name: &str) -> Result<(), TeamError> {
        let mut teams = self.lock_teams();
        if teams.remove(name).is_none() {
            return Err(TeamError::TeamNotFound {
                name: name.to_string(),
            });
        }

        let dir = self.team_dir(name);
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(|e| TeamError::Io {
                path: dir.clone(),
                source: e,
            })?;
        }
        tracing::info!(team = name, "team deleted");
        Ok(())
    }

    /// Register a teammate with a fresh persistent mailbox inside `team`.
    pub fn register_teammate(&self, team: &str, name: &str) -> Result<Teammate, TeamError> {
        let mut teams = self.lock_teams();
        let entry = teams.get_mut(team).ok_or_else(|| TeamError::TeamNotFound {
            name: team.to_string(),
        })?;
        if entry.members.contains_key(name) {
            return Err(TeamError::TeammateAlreadyExists {
                team: team.to_string(),
                name: name.to_string(),
            });
        }

        let inbox_dir = self.team_dir(team).join("inboxes");
        fs::create_dir_all(&inbox_dir).map_err(|e| TeamError::Io {
            path: inbox_dir.clone(),
            source: e,
        })?;

        let teammate = Teammate {
            name: name.to_string(),
            team_name: team.to_string(),
            inbox_path: inbox_dir.join(format!("{name}.jsonl")),
        };

        entry.config.members.push(TeamMember {
            name: name.to_string(),
            joined_at: now_ms(),
            unknown_fields: HashMap::new(),
        });
        self.write_team_config(&entry.config)?;

        entry.members.insert(name.to_string(), teammate.clone());
        tracing::info!(team, teammate = name, "teammate registered");
        Ok(teammate)
    }

    /// Send a message to a teammate's mailbox.
    ///
    /// The type string is validated against the fixed recognized set
    /// before anything else happens: an unknown type is rejected and no
    /// mailbox is touched. Unknown team or target yields the matching
    /// not-found error. On success the message is appended, timestamped,
    /// under the target's mailbox lock.
    pub fn send(
        &self,
        team: &str,
        target: &str,
        content: &str,
        type_str: &str,
        from: &str,
    ) -> Result<(), TeamError> {
        let msg_type: MessageType = type_str.parse()?;

        let inbox_path = {
            let teams = self.lock_teams();
            let entry = teams.get(team).ok_or_else(|| TeamError::TeamNotFound {
                name: team.to_string(),
            })?;
            let teammate =
                entry
                    .members
                    .get(target)
                    .ok_or_else(|| TeamError::TeammateNotFound {
                        team: team.to_string(),
                        name: target.to_string(),
                    })?;
            teammate.inbox_path.clone()
        };

        let message = Message {
            from: from.to_string(),
            msg_type,
            content: content.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            unknown_fields: HashMap::new(),
        };
        append_message(&inbox_path, &message)?;
        tracing::debug!(team, target, r#type = %msg_type, "message delivered");
        Ok(())
    }

    /// Consume every pending message for a teammate, in send order.
    ///
    /// This is the mailbox's single atomic read-and-clear: a second
    /// immediate call returns empty, and a concurrent send is either fully
    /// visible here or fully deferred to the next check.
    pub fn check_inbox(&self, team: &str, name: &str) -> Result<Vec<Message>, TeamError> {
        let inbox_path = {
            let teams = self.lock_teams();
            let entry = teams.get(team).ok_or_else(|| TeamError::TeamNotFound {
                name: team.to_string(),
            })?;
            let teammate = entry
                .members
                .get(name)
                .ok_or_else(|| TeamError::TeammateNotFound {
                    team: team.to_string(),
                    name: name.to_string(),
                })?;
            teammate.inbox_path.clone()
        };

        Ok(drain_messages(&inbox_path)?)
    }

    /// Human-readable status report.
    ///
    /// With a name: that team's roster with pending-message counts. With
    /// none: every team, or an empty-state line when nothing is
    /// registered. Pending counts are best-effort; an unreadable mailbox
    /// reports zero rather than failing the whole report.
    pub fn get_team_status(&self, name: Option<&str>) -> String {
        let teams = self.lock_teams();

        match name {
            Some(name) => match teams.get(name) {
                Some(team) => render_team(name, team),
                None => format!("Team '{name}' not found."),
            },
            None => {
                if teams.is_empty() {
                    return "No teams registered.".to_string();
                }
                let mut names: Vec<&String> = teams.keys().collect();
                names.sort();
                let mut report = String::new();
                for team_name in names {
                    if let Some(team) = teams.get(team_name.as_str()) {
                        report.push_str(&render_team(team_name, team));
                    }
                }
                report
            }
        }
    }

    fn write_team_config(&self, config: &TeamConfig) -> Result<(), TeamError> {
        let dir = self.team_dir(&config.name);
        let path = dir.join("config.json");
        let tmp = dir.join("config.json.tmp");

        let content = serde_json::to_vec_pretty(config).map_err(|e| TeamError::Json {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&tmp, &content).map_err(|e| TeamError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &path).map_err(|e| TeamError::Io {
            path: path.clone(),
            source: e,
        })?;
        Ok(())
    }
}

fn render_team(name: &str, team: &Team) -> String {
    let mut out = String::new();
    let count = team.members.len();
    let plural = if count == 1 { "teammate" } else { "teammates" };
    let _ = writeln!(out, "Team: {name} ({count} {plural})");

    let mut member_names: Vec<&String> = team.members.keys().collect();
    member_names.sort();
    for member in member_names {
        if let Some(teammate) = team.members.get(member.as_str()) {
            let pending = pending_count(&teammate.inbox_path).unwrap_or(0);
            let _ = writeln!(out, "  - {member}: {pending} pending");
        }
    }
    out
}

fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn directory() -> (TempDir, TeamDirectory) {
        let temp_dir = TempDir::new().unwrap();
        let dir = TeamDirectory::new(temp_dir.path().join("teams"));
        (temp_dir, dir)
    }

    #[test]
    fn test_create_team_is_idempotent_guard() {
        let (_tmp, dir) = directory();

        assert_eq!(dir.create_team("t").unwrap(), CreateOutcome::Created);
        assert_eq!(dir.create_team("t").unwrap(), CreateOutcome::AlreadyExists);

        // Roster unchanged by the second call
        let config: TeamConfig = serde_json::from_str(
            &fs::read_to_string(dir.base_dir().join("t").join("config.json")).unwrap(),
        )
        .unwrap();
        assert!(config.members.is_empty());
    }

    #[test]
    fn test_register_and_duplicate_teammate() {
        let (_tmp, dir) = directory();
        dir.create_team("t1").unwrap();

        let mate = dir.register_teammate("t1", "w").unwrap();
        assert_eq!(mate.team_name, "t1");
        assert!(mate.inbox_path.ends_with("t1/inboxes/w.jsonl"));

        let err = dir.register_teammate("t1", "w").unwrap_err();
        assert!(matches!(err, TeamError::TeammateAlreadyExists { .. }));

        let err = dir.register_teammate("missing", "w").unwrap_err();
        assert!(matches!(err, TeamError::TeamNotFound { .. }));
    }

    #[test]
    fn test_send_and_check_inbox_roundtrip() {
        let (_tmp, dir) = directory();
        dir.create_team("t1").unwrap();
        dir.register_teammate("t1", "w").unwrap();

        dir.send("t1", "w", "hi", "message", "team-lead").unwrap();

        let messages = dir.check_inbox("t1", "w").unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "hi");
        assert_eq!(messages[0].msg_type, MessageType::Message);
        assert_eq!(messages[0].from, "team-lead");

        // Consumed: a repeat check is empty
        assert!(dir.check_inbox("t1", "w").unwrap().is_empty());
    }

    #[test]
    fn test_send_preserves_order() {
        let (_tmp, dir) = directory();
        dir.create_team("t1").unwrap();
        dir.register_teammate("t1", "w").unwrap();

        for i in 0..5 {
            dir.send("t1", "w", &format!("m{i}"), "status", "lead")
                .unwrap();
        }

        let messages = dir.check_inbox("t1", "w").unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["m0", "m1", "m2", "m3", "m4"]);
    }

    #[test]
    fn test_send_rejects_unknown_type_without_touching_mailbox() {
        let (_tmp, dir) = directory();
        dir.create_team("t1").unwrap();
        let mate = dir.register_teammate("t1", "w").unwrap();

        let err = dir.send("t1", "w", "x", "bogus", "lead").unwrap_err();
        assert!(matches!(err, TeamError::InvalidMessageType(_)));

        // Mailbox untouched: no store file, nothing pending
        assert!(!mate.inbox_path.exists());
        assert!(dir.check_inbox("t1", "w").unwrap().is_empty());
    }

    #[test]
    fn test_send_to_unknown_team_or_target() {
        let (_tmp, dir) = directory();
        dir.create_team("t1").unwrap();

        let err = dir.send("nope", "w", "x", "message", "lead").unwrap_err();
        assert!(matches!(err, TeamError::TeamNotFound { .. }));

        let err = dir.send("t1", "ghost", "x", "message", "lead").unwrap_err();
        assert!(matches!(err, TeamError::TeammateNotFound { .. }));
    }

    #[test]
    fn test_delete_team_removes_mailboxes() {
        let (_tmp, dir) = directory();
        dir.create_team("del-team").unwrap();
        let mate = dir.register_teammate("del-team", "w1").unwrap();
        dir.send("del-team", "w1", "pending", "message", "lead")
            .unwrap();

        dir.delete_team("del-team").unwrap();
        assert!(!mate.inbox_path.exists());
        assert!(!dir.base_dir().join("del-team").exists());

        let err = dir.delete_team("del-team").unwrap_err();
        assert!(matches!(err, TeamError::TeamNotFound { .. }));

        // Name is re-creatable after deletion
        assert_eq!(
            dir.create_team("del-team").unwrap(),
            CreateOutcome::Created
        );
    }

    #[test]
    fn test_status_reporting() {
        let (_tmp, dir) = directory();
        assert!(dir.get_team_status(None).contains("No teams"));

        dir.create_team("status-team").unwrap();
        dir.register_teammate("status-team", "w").unwrap();
        dir.send("status-team", "w", "hi", "message", "lead").unwrap();

        let status = dir.get_team_status(Some("status-team"));
        assert!(status.contains("status-team"));
        assert!(status.contains("w: 1 pending"));

        let all = dir.get_team_status(None);
        assert!(all.contains("status-team"));

        assert!(dir.get_team_status(Some("ghost")).contains("not found"));
    }

    #[test]
    fn test_roster_persisted_to_config_json() {
        let (_tmp, dir) = directory();
        dir.create_team("t1").unwrap();
        dir.register_teammate("t1", "alpha").unwrap();
        dir.register_teammate("t1", "beta").unwrap();

        let config: TeamConfig = serde_json::from_str(
            &fs::read_to_string(dir.base_dir().join("t1").join("config.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(config.name, "t1");
        assert_eq!(config.members.len(), 2);
        assert_eq!(config.members[0].name, "alpha");
        assert_eq!(config.members[1].name, "beta");
    }
}
