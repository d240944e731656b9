//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of change recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Record types that are audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Client,
    Contract,
    Session,
    Expense,
    Invoice,
    Goal,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityType::Client => "Client",
            EntityType::Contract => "Contract",
            EntityType::Session => "Session",
            EntityType::Expense => "Expense",
            EntityType::Invoice => "Invoice",
            EntityType::Goal => "Goal",
        };
        f.write_str(s)
    }
}

/// One line of the audit log
///
/// Holds JSON snapshots of the record before and/or after the change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,
    pub entity_id: String,

    /// Human label, e.g. the client name or invoice number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,
}

impl AuditEntry {
    fn new(
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: None,
            after: None,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Create, entity_type, entity_id, entity_name);
        entry.after = serde_json::to_value(entity).ok();
        entry
    }

    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Update, entity_type, entity_id, entity_name);
        entry.before = serde_json::to_value(before).ok();
        entry.after = serde_json::to_value(after).ok();
        entry
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Delete, entity_type, entity_id, entity_name);
        entry.before = serde_json::to_value(entity).ok();
        entry
    }

    /// Top-level fields whose values differ between `before` and `after`
    pub fn changed_fields(&self) -> Vec<String> {
        let (Some(serde_json::Value::Object(before)), Some(serde_json::Value::Object(after))) =
            (&self.before, &self.after)
        else {
            return Vec::new();
        };

        let mut fields: Vec<String> = after
            .iter()
            .filter(|(key, value)| key.as_str() != "updated_at" && before.get(*key) != Some(value))
            .map(|(key, _)| key.clone())
            .collect();
        fields.extend(
            before
                .keys()
                .filter(|key| !after.contains_key(*key))
                .cloned(),
        );
        fields.sort();
        fields
    }

    /// One-line rendering for terminal output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        let changed = self.changed_fields();
        if !changed.is_empty() {
            output.push_str(&format!(" changed: {}", changed.join(", ")));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(Operation::Delete.to_string(), "DELETE");
        assert_eq!(EntityType::Invoice.to_string(), "Invoice");
    }

    #[test]
    fn test_create_has_only_after() {
        let entry = AuditEntry::create(
            EntityType::Client,
            "cli-1a2b3c4d",
            Some("Acme".to_string()),
            &json!({"name": "Acme"}),
        );
        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert!(entry.after.is_some());
        assert!(entry.changed_fields().is_empty());
    }

    #[test]
    fn test_update_changed_fields() {
        let entry = AuditEntry::update(
            EntityType::Invoice,
            "inv-1a2b3c4d",
            Some("INV-0001".to_string()),
            &json!({"status": "pending", "paid_date": null, "updated_at": "a"}),
            &json!({"status": "paid", "paid_date": "2024-06-03", "updated_at": "b"}),
        );
        assert_eq!(entry.changed_fields(), vec!["paid_date", "status"]);
        assert!(entry
            .format_human_readable()
            .contains("UPDATE Invoice inv-1a2b3c4d (INV-0001) changed: paid_date, status"));
    }
}
