use serde::Deserialize;
use std::collections::HashSet;

use super::member::normalize_access_code;

/// One participant in a roster file.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterEntry {
    pub id: Option<String>,
    pub display_name: String,
    pub avatar: Option<String>,
    pub access_code: String,
    #[serde(default)]
    pub is_admin: bool,
    pub santa_for: Option<String>,
    pub roast_target: Option<String>,
}

/// Checks a roster before anything is written.
///
/// Every entry needs an id here, so callers assign generated ids first.
pub fn validate(entries: &[RosterEntry]) -> Result<(), String> {
    let mut ids = HashSet::new();
    let mut codes = HashSet::new();

    for entry in entries {
        let id = entry
            .id
            .as_deref()
            .ok_or_else(|| format!("roster entry {:?} has no id", entry.display_name))?;
        if entry.display_name.trim().is_empty() {
            return Err(format!("member {id} has an empty display name"));
        }
        if !ids.insert(id) {
            return Err(format!("duplicate member id {id}"));
        }
        let code = normalize_access_code(&entry.access_code);
        if code.is_empty() {
            return Err(format!("member {id} has an empty access code"));
        }
        if !codes.insert(code) {
            return Err(format!("duplicate access code for member {id}"));
        }
    }

    for entry in entries {
        let id = entry.id.as_deref().unwrap_or_default();
        for target in [&entry.santa_for, &entry.roast_target].into_iter().flatten() {
            if target == id {
                return Err(format!("member {id} is assigned to themselves"));
            }
            if !ids.contains(target.as_str()) {
                return Err(format!("member {id} is assigned to unknown member {target}"));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, code: &str, santa_for: Option<&str>) -> RosterEntry {
        RosterEntry {
            id: Some(id.to_string()),
            display_name: id.to_uppercase(),
            avatar: None,
            access_code: code.to_string(),
            is_admin: false,
            santa_for: santa_for.map(str::to_string),
            roast_target: None,
        }
    }

    #[test]
    fn test_valid_roster() {
        let roster = vec![entry("a", "A1", Some("b")), entry("b", "B1", Some("a"))];
        assert!(validate(&roster).is_ok());
    }

    #[test]
    fn test_duplicate_access_code_is_case_insensitive() {
        let roster = vec![entry("a", "ELF", None), entry("b", " elf ", None)];
        let err = validate(&roster).unwrap_err();
        assert!(err.contains("duplicate access code"), "{err}");
    }

    #[test]
    fn test_self_assignment_rejected() {
        let roster = vec![entry("a", "A1", Some("a"))];
        assert!(validate(&roster).unwrap_err().contains("themselves"));
    }

    #[test]
    fn test_unknown_assignment_rejected() {
        let roster = vec![entry("a", "A1", Some("zed"))];
        assert!(validate(&roster).unwrap_err().contains("unknown member zed"));
    }

    #[test]
    fn test_missing_id_rejected() {
        let mut e = entry("a", "A1", None);
        e.id = None;
        assert!(validate(&[e]).is_err());
    }

    #[test]
    fn test_parses_minimal_entry() {
        let json = r#"[{"display_name": "Santa", "access_code": "NORTHPOLE", "is_admin": true}]"#;
        let parsed: Vec<RosterEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].is_admin);
        assert!(parsed[0].id.is_none());
    }
}
