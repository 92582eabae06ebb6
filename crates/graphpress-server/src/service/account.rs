//! Account operations: signup, login and identity checks.
//!
//! Credentials are matched on username plus the stored password digest
//! (see [`graphpress_core::credential`]).

use graphpress_core::credential::password_digest;
use graphpress_core::validation::{is_valid_email, is_valid_password, is_valid_username};
use graphpress_core::{Node, NodeId, UserProfile};

use super::{is_blank, GraphService};
use crate::error::ApiError;
use crate::identity::Caller;

const SIGNUP_REQUIRED: &str = "Valid username, email and password required.";
const USERNAME_INVALID: &str = "Invalid username";
const PASSWORD_INVALID: &str = "Invalid password";
const USERNAME_TAKEN: &str = "Username already taken";
const LOGIN_REQUIRED: &str = "Username and password fields are required.";
const LOGIN_MISMATCH: &str = "Information don't match records";

impl GraphService {
    /// Creates a user and returns its id.
    pub fn signup(
        &mut self,
        username: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<NodeId, ApiError> {
        let (username, email, password) = match (username, email, password) {
            (Some(u), Some(e), Some(p))
                if !is_blank(u) && !is_blank(p) && is_valid_email(e) =>
            {
                (u, e, p)
            }
            _ => return Err(ApiError::Validation(SIGNUP_REQUIRED.to_string())),
        };
        if !is_valid_username(username) {
            return Err(ApiError::Validation(USERNAME_INVALID.to_string()));
        }
        if !is_valid_password(password) {
            return Err(ApiError::Validation(PASSWORD_INVALID.to_string()));
        }
        if self.store.find_user_by_username(username)?.is_some() {
            return Err(ApiError::Conflict(USERNAME_TAKEN.to_string()));
        }

        let user = self.store.create_node(Node::user(UserProfile::new(
            username.to_string(),
            email.to_string(),
            password_digest(password),
        )))?;
        tracing::info!(user = %user.id, "user signed up");
        Ok(user.id)
    }

    /// Matches credentials against stored users.
    ///
    /// Exactly one user must match; anything else is a mismatch.
    pub fn login(&self, username: Option<&str>, password: Option<&str>) -> Result<NodeId, ApiError> {
        let (username, password) = match (username, password) {
            (Some(u), Some(p)) if !is_blank(u) && !is_blank(p) => (u, p),
            _ => return Err(ApiError::Validation(LOGIN_REQUIRED.to_string())),
        };

        let matches = self.store.find_users_by_credentials(username, password)?;
        match matches.as_slice() {
            [user] => Ok(user.id),
            [] => Err(ApiError::Validation(LOGIN_MISMATCH.to_string())),
            many => {
                tracing::warn!(
                    username,
                    count = many.len(),
                    "data integrity anomaly: several users share credentials"
                );
                Err(ApiError::Validation(LOGIN_MISMATCH.to_string()))
            }
        }
    }

    /// The caller's own id.
    pub fn whoami(&self, caller: &Caller) -> NodeId {
        caller.user_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphpress_core::NodeKind;

    #[test]
    fn signup_stores_digest_not_password() {
        let mut service = GraphService::in_memory();
        let id = service
            .signup(Some("alice"), Some("alice@example.com"), Some("hunter2"))
            .unwrap();
        let node = service.store().get_node(id).unwrap();
        let profile = node.as_user().unwrap();
        assert_eq!(profile.password, password_digest("hunter2"));
        assert_ne!(profile.password, "hunter2");
    }

    #[test]
    fn signup_validation_messages() {
        let mut service = GraphService::in_memory();
        let cases = [
            ((None, Some("a@example.com"), Some("hunter2")), SIGNUP_REQUIRED),
            ((Some("alice"), Some("not-an-email"), Some("hunter2")), SIGNUP_REQUIRED),
            ((Some("alice"), Some("a@example.com"), Some("")), SIGNUP_REQUIRED),
            ((Some("al ice"), Some("a@example.com"), Some("hunter2")), USERNAME_INVALID),
            ((Some("alice"), Some("a@example.com"), Some("abc")), PASSWORD_INVALID),
        ];
        for ((username, email, password), expected) in cases {
            match service.signup(username, email, password) {
                Err(ApiError::Validation(msg)) => assert_eq!(msg, expected),
                other => panic!("expected {:?}, got {:?}", expected, other),
            }
        }
        assert!(service.store().nodes_of_kind(NodeKind::User).unwrap().is_empty());
    }

    #[test]
    fn signup_ids_are_unique() {
        let mut service = GraphService::in_memory();
        let ids: Vec<NodeId> = (0..20)
            .map(|i| {
                service
                    .signup(
                        Some(&format!("user{}", i)),
                        Some(&format!("user{}@example.com", i)),
                        Some("hunter2"),
                    )
                    .unwrap()
            })
            .collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn duplicate_username_conflicts() {
        let mut service = GraphService::in_memory();
        service
            .signup(Some("alice"), Some("alice@example.com"), Some("hunter2"))
            .unwrap();
        assert!(matches!(
            service.signup(Some("alice"), Some("other@example.com"), Some("hunter3")),
            Err(ApiError::Conflict(_))
        ));
    }

    #[test]
    fn login_matches_digest() {
        let mut service = GraphService::in_memory();
        let id = service
            .signup(Some("alice"), Some("alice@example.com"), Some("hunter2"))
            .unwrap();
        assert_eq!(service.login(Some("alice"), Some("hunter2")).unwrap(), id);
        assert!(matches!(
            service.login(Some("alice"), Some("hunter3")),
            Err(ApiError::Validation(msg)) if msg == LOGIN_MISMATCH
        ));
        assert!(matches!(
            service.login(Some("bob"), Some("hunter2")),
            Err(ApiError::Validation(msg)) if msg == LOGIN_MISMATCH
        ));
        assert!(matches!(
            service.login(Some("alice"), None),
            Err(ApiError::Validation(msg)) if msg == LOGIN_REQUIRED
        ));
    }

    #[test]
    fn whoami_echoes_caller() {
        let service = GraphService::in_memory();
        let id = NodeId::generate();
        assert_eq!(service.whoami(&Caller::new(id)), id);
    }
}
