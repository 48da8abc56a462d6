//! Combining the two profile services into one view.
//!
//! The students service and the users service both describe the signed-in
//! student. Their `me` objects are merged field by field, with the students
//! service layered on top.

use serde_json::Value;

use bktutor_shared::format::initials;
use bktutor_shared::protocol::{Fields, StudentProfileResponse, UserProfileResponse};
use bktutor_shared::types::SessionId;

/// How a same-named field from the overriding object is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// Every present field overrides, even `""` or `null`.
    #[default]
    AlwaysOverride,
    /// Empty strings and `null` leave the base value in place.
    PreferNonEmpty,
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Shallow object spread: `{...base, ...over}` under `policy`.
pub fn spread(base: &Fields, over: &Fields, policy: MergePolicy) -> Fields {
    let mut merged = base.clone();
    for (key, value) in over {
        if policy == MergePolicy::PreferNonEmpty && is_blank(value) && merged.contains_key(key) {
            continue;
        }
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Field as display text; numbers are rendered, everything else is absent.
pub fn text_field(fields: &Fields, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(fields: &Fields, key: &str) -> Option<String> {
    text_field(fields, key).filter(|s| !s.trim().is_empty())
}

/// Both profile responses plus the merged `me`.
#[derive(Debug, Clone, Default)]
pub struct ProfileSnapshot {
    pub me: Fields,
    pub students: StudentProfileResponse,
}

impl ProfileSnapshot {
    /// A missing response (non-2xx) counts as an empty body.
    pub fn merge(
        students: Option<StudentProfileResponse>,
        users: Option<UserProfileResponse>,
        policy: MergePolicy,
    ) -> Self {
        let students = students.unwrap_or_default();
        let base = users.map(|u| u.me_fields()).unwrap_or_default();
        let me = spread(&base, &students.me_fields(), policy);
        Self { me, students }
    }

    pub fn field(&self, key: &str) -> Option<String> {
        text_field(&self.me, key)
    }

    /// Session ids the student already booked.
    pub fn registered_ids(&self) -> Vec<SessionId> {
        self.students
            .registered_bookings()
            .iter()
            .filter_map(|b| b.session_id.clone())
            .collect()
    }
}

/// Who the sidebar says is signed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarIdentity {
    pub display: String,
    pub initials: String,
    pub avatar_url: Option<String>,
    pub id_label: String,
}

impl SidebarIdentity {
    pub fn resolve(profile_me: &Fields, sidebar_me: Option<&Fields>) -> Self {
        let empty = Fields::new();
        let sidebar = sidebar_me.unwrap_or(&empty);

        let display = [
            (profile_me, "fullName"),
            (profile_me, "displayName"),
            (sidebar, "fullName"),
            (sidebar, "displayName"),
            (profile_me, "email"),
            (sidebar, "email"),
        ]
        .into_iter()
        .find_map(|(fields, key)| non_empty(fields, key))
        .unwrap_or_else(|| "ST".to_string());

        let avatar_url =
            non_empty(profile_me, "avatarUrl").or_else(|| non_empty(sidebar, "avatarUrl"));

        let id = non_empty(profile_me, "studentId")
            .or_else(|| non_empty(profile_me, "id"))
            .or_else(|| non_empty(sidebar, "id"));
        let id_label = id.map(|id| format!("ID: {id}")).unwrap_or_default();

        Self {
            initials: initials(&display),
            display,
            avatar_url,
            id_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(v: Value) -> Fields {
        match v {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_always_override_keeps_empty() {
        let a = fields(json!({"name": "Jo"}));
        let b = fields(json!({"name": ""}));
        let merged = spread(&a, &b, MergePolicy::AlwaysOverride);
        assert_eq!(merged["name"], "");
    }

    #[test]
    fn test_prefer_non_empty() {
        let a = fields(json!({"name": "Jo", "major": "CS"}));
        let b = fields(json!({"name": "", "major": null, "phone": ""}));
        let merged = spread(&a, &b, MergePolicy::PreferNonEmpty);
        assert_eq!(merged["name"], "Jo");
        assert_eq!(merged["major"], "CS");
        assert_eq!(merged["phone"], "");
    }

    #[test]
    fn test_snapshot_students_service_wins() {
        let students: StudentProfileResponse = serde_json::from_value(json!({
            "student": {"fullName": "Nguyen Van An", "phone": ""},
            "bookedSessions": [{"sessionId": "sess-1"}, {"id": "bk-2"}]
        }))
        .unwrap();
        let users: UserProfileResponse = serde_json::from_value(json!({
            "me": {"fullName": "An", "phone": "0912", "email": "an@hcmut.edu.vn"}
        }))
        .unwrap();

        let snap = ProfileSnapshot::merge(Some(students), Some(users), MergePolicy::default());
        assert_eq!(snap.field("fullName").as_deref(), Some("Nguyen Van An"));
        assert_eq!(snap.field("phone").as_deref(), Some(""));
        assert_eq!(snap.field("email").as_deref(), Some("an@hcmut.edu.vn"));
        assert_eq!(snap.registered_ids(), vec![SessionId::from("sess-1")]);
    }

    #[test]
    fn test_snapshot_missing_responses() {
        let snap = ProfileSnapshot::merge(None, None, MergePolicy::AlwaysOverride);
        assert!(snap.me.is_empty());
        assert!(snap.registered_ids().is_empty());
    }

    #[test]
    fn test_sidebar_identity_chain() {
        let profile = fields(json!({"fullName": " ", "studentId": 2213001}));
        let sidebar = fields(json!({"displayName": "an nguyen", "avatarUrl": "/a.png", "id": "u-1"}));
        let who = SidebarIdentity::resolve(&profile, Some(&sidebar));
        assert_eq!(who.display, "an nguyen");
        assert_eq!(who.initials, "AN");
        assert_eq!(who.avatar_url.as_deref(), Some("/a.png"));
        assert_eq!(who.id_label, "ID: 2213001");

        let nobody = SidebarIdentity::resolve(&Fields::new(), None);
        assert_eq!(nobody.display, "ST");
        assert_eq!(nobody.id_label, "");
    }
}
