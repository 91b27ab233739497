use infra::models::UserRow;
use infra::repos::UpdateUserNames;

/// Name fields offered by an incoming record (e.g. a prospect) for an
/// existing account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityNames {
    pub first_name: String,
    pub last_name: String,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Fill-if-absent merge: a field is only written when the account's value is
/// blank and the incoming value is not. Non-blank account fields are never
/// overwritten.
pub fn backfill_names(existing: &UserRow, incoming: &IdentityNames) -> UpdateUserNames {
    let pick = |current: &str, offered: &str| {
        (is_blank(current) && !is_blank(offered)).then(|| offered.trim().to_string())
    };

    UpdateUserNames {
        first_name: pick(&existing.first_name, &incoming.first_name),
        last_name: pick(&existing.last_name, &incoming.last_name),
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal shape check: something@something.tld with no whitespace.
pub fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.contains('@') && domain.contains('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(first: &str, last: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn names(first: &str, last: &str) -> IdentityNames {
        IdentityNames {
            first_name: first.to_string(),
            last_name: last.to_string(),
        }
    }

    #[test]
    fn fills_blank_fields_only() {
        let patch = backfill_names(&user("", "Smith"), &names("Jane", "Doe"));
        assert_eq!(patch.first_name.as_deref(), Some("Jane"));
        assert_eq!(patch.last_name, None);
    }

    #[test]
    fn whitespace_counts_as_blank() {
        let patch = backfill_names(&user("  ", ""), &names(" Jane ", "Doe"));
        assert_eq!(patch.first_name.as_deref(), Some("Jane"));
        assert_eq!(patch.last_name.as_deref(), Some("Doe"));
    }

    #[test]
    fn never_overwrites_or_blanks_existing_names() {
        let patch = backfill_names(&user("John", "Smith"), &names("Jane", "Doe"));
        assert!(patch.is_empty());

        let patch = backfill_names(&user("", ""), &names("", "  "));
        assert!(patch.is_empty());
    }

    #[test]
    fn email_checks() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
        assert!(is_plausible_email("jane@example.com"));
        assert!(!is_plausible_email("jane@example"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("ja ne@example.com"));
        assert!(!is_plausible_email("jane@@example.com"));
    }
}
