use serde::{Deserialize, Serialize};

/// Public view of a member. Safe to show to every participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub is_admin: bool,
}

/// A member's view of their own record, including secret assignments.
#[derive(Debug, Clone, Serialize)]
pub struct SelfMember {
    pub id: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub is_admin: bool,
    pub santa_for: Option<String>,
    pub roast_target: Option<String>,
    pub votes_locked: bool,
}

/// Admin overview entry. Exposes whether a password exists, never the hash.
#[derive(Debug, Clone, Serialize)]
pub struct AdminMemberView {
    pub id: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub access_code: String,
    pub password_set: bool,
    pub is_admin: bool,
    pub santa_for: Option<String>,
    pub roast_target: Option<String>,
    pub votes_locked: bool,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct MemberRow {
    pub id: String,
    pub display_name: String,
    pub avatar: Option<String>,
    pub access_code: String,
    pub password_hash: Option<String>,
    pub is_admin: bool,
    pub santa_for: Option<String>,
    pub roast_target: Option<String>,
    pub votes_locked: bool,
    pub created_at: String,
}

impl MemberRow {
    pub fn to_public(&self) -> Member {
        Member {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            avatar: self.avatar.clone(),
            is_admin: self.is_admin,
        }
    }

    pub fn to_self(&self) -> SelfMember {
        SelfMember {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            avatar: self.avatar.clone(),
            is_admin: self.is_admin,
            santa_for: self.santa_for.clone(),
            roast_target: self.roast_target.clone(),
            votes_locked: self.votes_locked,
        }
    }

    pub fn to_admin_view(&self) -> AdminMemberView {
        AdminMemberView {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            avatar: self.avatar.clone(),
            access_code: self.access_code.clone(),
            password_set: self.password_hash.is_some(),
            is_admin: self.is_admin,
            santa_for: self.santa_for.clone(),
            roast_target: self.roast_target.clone(),
            votes_locked: self.votes_locked,
            created_at: self.created_at.clone(),
        }
    }
}

/// Admin edit of gift and roast assignments. `Some("")` clears a field.
#[derive(Debug, Deserialize)]
pub struct UpdateAssignments {
    pub santa_for: Option<String>,
    pub roast_target: Option<String>,
}

/// Access codes are matched case-insensitively, ignoring surrounding space.
pub fn normalize_access_code(code: &str) -> String {
    code.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> MemberRow {
        MemberRow {
            id: "m1".into(),
            display_name: "Noor".into(),
            avatar: None,
            access_code: "elf-42".into(),
            password_hash: Some("$argon2id$...".into()),
            is_admin: false,
            santa_for: Some("m2".into()),
            roast_target: Some("m3".into()),
            votes_locked: false,
            created_at: "2025-12-01 10:00:00".into(),
        }
    }

    #[test]
    fn test_public_view_hides_assignments() {
        let json = serde_json::to_value(row().to_public()).unwrap();
        assert!(json.get("santa_for").is_none());
        assert!(json.get("access_code").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_admin_view_reports_password_presence_only() {
        let json = serde_json::to_value(row().to_admin_view()).unwrap();
        assert_eq!(json["password_set"], true);
        assert_eq!(json["access_code"], "elf-42");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_normalize_access_code() {
        assert_eq!(normalize_access_code("  ELF-42 \n"), "elf-42");
    }
}
