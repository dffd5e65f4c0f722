//! Account record data structures

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Separator between labels in the raw label text
const LABEL_SEPARATOR: char = ';';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Credentials are checked against the locally stored password
    #[default]
    #[serde(rename = "local", alias = "Локальная")]
    Local,
    /// Credentials are checked against an external directory
    #[serde(rename = "LDAP")]
    Ldap,
}

impl AccountType {
    /// Whether accounts of this kind keep a password of their own
    pub fn requires_password(&self) -> bool {
        matches!(self, AccountType::Local)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Local => "local",
            AccountType::Ldap => "LDAP",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Локальная" => Ok(AccountType::Local),
            other => match other.to_lowercase().as_str() {
                "local" => Ok(AccountType::Local),
                "ldap" => Ok(AccountType::Ldap),
                _ => Err(format!("Unknown account type: {}", s)),
            },
        }
    }
}

/// A single display label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Split raw label text into labels, in the order they were typed.
///
/// Parts are separated by `;`, trimmed, and empty parts are dropped.
pub fn labels_from_raw(raw: &str) -> Vec<Label> {
    raw.split(LABEL_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Label::new)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    /// Unique identifier, fixed at creation
    pub id: String,
    /// Label text exactly as the user typed it
    pub raw_label: String,
    /// Labels derived from `raw_label`, in render order
    pub labels: Vec<Label>,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub login: String,
    /// `None` for accounts that keep no password of their own
    #[serde(deserialize_with = "required_nullable")]
    pub password: Option<String>,
}

/// Accept `null` but not a missing key
fn required_nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

impl AccountRecord {
    /// Create a blank local account with a fresh id
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            raw_label: String::new(),
            labels: Vec::new(),
            account_type: AccountType::default(),
            login: String::new(),
            password: Some(String::new()),
        }
    }

    /// Replace the raw label and re-derive `labels` from it
    pub fn set_raw_label(&mut self, raw: impl Into<String>) {
        self.raw_label = raw.into();
        self.labels = labels_from_raw(&self.raw_label);
    }

    /// Change the account kind.
    ///
    /// Directory-backed accounts drop their password; switching back to a
    /// local account starts from an empty one.
    pub fn set_account_type(&mut self, account_type: AccountType) {
        self.account_type = account_type;
        if account_type.requires_password() {
            if self.password.is_none() {
                self.password = Some(String::new());
            }
        } else {
            self.password = None;
        }
    }
}

impl Default for AccountRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_defaults() {
        let account = AccountRecord::new();
        assert!(!account.id.is_empty());
        assert_eq!(account.raw_label, "");
        assert!(account.labels.is_empty());
        assert_eq!(account.account_type, AccountType::Local);
        assert_eq!(account.login, "");
        assert_eq!(account.password.as_deref(), Some(""));
    }

    #[test]
    fn test_new_accounts_get_distinct_ids() {
        let a = AccountRecord::new();
        let b = AccountRecord::new();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_labels_from_raw() {
        let labels = labels_from_raw(" work ; ;home;  vpn  ");
        let texts: Vec<&str> = labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["work", "home", "vpn"]);

        assert!(labels_from_raw("").is_empty());
        assert!(labels_from_raw(" ; ").is_empty());
    }

    #[test]
    fn test_set_raw_label() {
        let mut account = AccountRecord::new();
        account.set_raw_label("a;b");
        assert_eq!(account.raw_label, "a;b");
        assert_eq!(account.labels, vec![Label::new("a"), Label::new("b")]);
    }

    #[test]
    fn test_switch_account_type() {
        let mut account = AccountRecord::new();
        account.password = Some("secret".to_string());

        account.set_account_type(AccountType::Ldap);
        assert_eq!(account.password, None);

        account.set_account_type(AccountType::Local);
        assert_eq!(account.password.as_deref(), Some(""));

        // Staying local keeps the password
        account.password = Some("kept".to_string());
        account.set_account_type(AccountType::Local);
        assert_eq!(account.password.as_deref(), Some("kept"));
    }

    #[test]
    fn test_json_field_names() {
        let account = AccountRecord {
            id: "u1".to_string(),
            raw_label: "x".to_string(),
            labels: vec![Label::new("x")],
            account_type: AccountType::Ldap,
            login: "alice".to_string(),
            password: None,
        };

        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "u1",
                "rawLabel": "x",
                "labels": [{ "text": "x" }],
                "type": "LDAP",
                "login": "alice",
                "password": null
            })
        );
    }

    #[test]
    fn test_legacy_local_tag() {
        let account: AccountRecord = serde_json::from_str(
            r#"{"id":"u1","rawLabel":"","labels":[],"type":"Локальная","login":"","password":""}"#,
        )
        .unwrap();
        assert_eq!(account.account_type, AccountType::Local);

        // Written back with the canonical tag
        let json = serde_json::to_string(&account).unwrap();
        assert!(json.contains(r#""type":"local""#));
    }

    #[test]
    fn test_password_key_is_required() {
        let missing = serde_json::from_str::<AccountRecord>(
            r#"{"id":"u1","rawLabel":"","labels":[],"type":"LDAP","login":""}"#,
        );
        assert!(missing.is_err());

        let null: AccountRecord = serde_json::from_str(
            r#"{"id":"u1","rawLabel":"","labels":[],"type":"LDAP","login":"","password":null}"#,
        )
        .unwrap();
        assert_eq!(null.password, None);
    }

    #[test]
    fn test_account_type_from_str() {
        assert_eq!("local".parse::<AccountType>(), Ok(AccountType::Local));
        assert_eq!("LDAP".parse::<AccountType>(), Ok(AccountType::Ldap));
        assert_eq!("Локальная".parse::<AccountType>(), Ok(AccountType::Local));
        assert!("kerberos".parse::<AccountType>().is_err());
    }
}
