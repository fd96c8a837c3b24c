use serde::{Deserialize, Serialize};

/// Authenticated identity handed out by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub uid: String,
    pub is_anonymous: bool,
    pub display_name: Option<String>,
}

impl Principal {
    pub fn full(uid: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            uid: uid.into(),
            is_anonymous: false,
            display_name,
        }
    }

    pub fn guest(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            is_anonymous: true,
            display_name: None,
        }
    }
}

/// Visibility and permission flags derived from the current principal.
/// Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    pub can_edit: bool,
    pub show_mature: bool,
}

impl Session {
    pub fn for_principal(principal: Option<&Principal>) -> Self {
        let can_edit = principal.map(|p| !p.is_anonymous).unwrap_or(false);
        Self {
            can_edit,
            show_mature: can_edit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_principal_can_edit_and_see_mature() {
        let principal = Principal::full("u1", Some("Rika".to_string()));
        let session = Session::for_principal(Some(&principal));
        assert!(session.can_edit);
        assert!(session.show_mature);
    }

    #[test]
    fn test_guest_and_absent_are_read_only() {
        let guest = Principal::guest("g1");
        assert_eq!(Session::for_principal(Some(&guest)), Session::default());
        assert_eq!(Session::for_principal(None), Session::default());
    }
}
