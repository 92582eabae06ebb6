//! Profile operations: read a user's public attributes, update one's own.

use chrono::{NaiveDate, Utc};

use graphpress_core::validation::{
    birthday_is_old_enough, is_valid_avatar, is_valid_username, parse_birthday,
};
use graphpress_core::{AttributeMap, NodeId, NodeKind, UserField};
use graphpress_storage::StorageError;

use super::{is_blank, GraphService};
use crate::error::ApiError;
use crate::identity::Caller;

const USER_ID_REQUIRED: &str = "Valid user ID required.";
const INVALID_USER_ID: &str = "Invalid user ID";
const AVATAR_INVALID: &str = "Avatar URL invalid.";
const BIRTHDAY_INVALID: &str = "Birthday invalid.";
const USERNAME_INVALID: &str = "Invalid username";
const USERNAME_TAKEN: &str = "Username already taken";
const NO_FIELD: &str = "No field to set";

/// A partial profile update. `None` and blank values leave a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub birthday: Option<String>,
    pub avatar: Option<String>,
    pub about: Option<String>,
}

impl ProfileUpdate {
    fn given(value: &Option<String>) -> Option<&str> {
        value.as_deref().filter(|v| !is_blank(v))
    }
}

/// "Following fields set successfully: a, b"
pub fn fields_set_message(fields: &[UserField]) -> String {
    let names: Vec<&str> = fields.iter().map(UserField::api_name).collect();
    format!("Following fields set successfully: {}", names.join(", "))
}

impl GraphService {
    /// All attributes of the user named by `id`, password excluded.
    pub fn get_profile(&self, id: Option<&str>) -> Result<AttributeMap, ApiError> {
        let raw = match id {
            Some(raw) if !is_blank(raw) => raw,
            _ => return Err(ApiError::Validation(USER_ID_REQUIRED.to_string())),
        };
        let invalid = || ApiError::InvalidId(INVALID_USER_ID.to_string());
        let id = NodeId::parse(raw.trim()).map_err(|_| invalid())?;
        let node = match self.store.get_node(id) {
            Ok(node) => node,
            Err(StorageError::NodeNotFound { .. }) => return Err(invalid()),
            Err(err) => return Err(err.into()),
        };
        if node.kind() != NodeKind::User {
            return Err(invalid());
        }
        Ok(node.attributes().redacted())
    }

    /// Applies `update` to the caller's profile and returns the fields set,
    /// in application order.
    pub fn set_profile(
        &mut self,
        caller: &Caller,
        update: &ProfileUpdate,
    ) -> Result<Vec<UserField>, ApiError> {
        self.set_profile_on(caller, update, Utc::now().date_naive())
    }

    /// [`GraphService::set_profile`] with an explicit "today" for the
    /// birthday cutoff.
    pub fn set_profile_on(
        &mut self,
        caller: &Caller,
        update: &ProfileUpdate,
        today: NaiveDate,
    ) -> Result<Vec<UserField>, ApiError> {
        let username = ProfileUpdate::given(&update.username);
        let birthday = ProfileUpdate::given(&update.birthday);
        let avatar = ProfileUpdate::given(&update.avatar);
        let about = ProfileUpdate::given(&update.about);

        // Every check runs before the first write.
        if let Some(avatar) = avatar {
            if !is_valid_avatar(avatar) {
                return Err(ApiError::Validation(AVATAR_INVALID.to_string()));
            }
        }
        let birthday = match birthday {
            Some(raw) => match parse_birthday(raw) {
                Some(date) if birthday_is_old_enough(date, today) => {
                    Some(date.format("%Y-%m-%d").to_string())
                }
                _ => return Err(ApiError::Validation(BIRTHDAY_INVALID.to_string())),
            },
            None => None,
        };
        if let Some(username) = username {
            if !is_valid_username(username) {
                return Err(ApiError::Validation(USERNAME_INVALID.to_string()));
            }
            if let Some(holder) = self.store.find_user_by_username(username)? {
                if holder.id != caller.user_id() {
                    return Err(ApiError::Conflict(USERNAME_TAKEN.to_string()));
                }
            }
        }

        let changes: Vec<(UserField, &str)> = [
            (UserField::Username, username),
            (UserField::Birthday, birthday.as_deref()),
            (UserField::Avatar, avatar),
            (UserField::About, about),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect();

        if changes.is_empty() {
            return Err(ApiError::NoFieldsProvided(NO_FIELD.to_string()));
        }

        self.store.set_attributes(caller.user_id(), &changes)?;
        tracing::info!(user = %caller.user_id(), fields = changes.len(), "profile updated");
        Ok(changes.into_iter().map(|(field, _)| field).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn setup() -> (GraphService, Caller) {
        let mut service = GraphService::in_memory();
        let id = service
            .signup(Some("alice"), Some("alice@example.com"), Some("hunter2"))
            .unwrap();
        (service, Caller::new(id))
    }

    fn update() -> ProfileUpdate {
        ProfileUpdate::default()
    }

    #[test]
    fn get_profile_hides_password() {
        let (service, alice) = setup();
        let profile = service
            .get_profile(Some(&alice.user_id().to_string()))
            .unwrap();
        let keys: Vec<&str> = profile.keys().collect();
        assert_eq!(keys, vec!["Username", "Email"]);
        assert_eq!(profile.get("Username"), Some("alice"));
    }

    #[test]
    fn get_profile_rejects_bad_ids() {
        let (mut service, alice) = setup();
        assert!(matches!(
            service.get_profile(None),
            Err(ApiError::Validation(msg)) if msg == USER_ID_REQUIRED
        ));
        for bad in ["1234", "zz000000000000000000000000000000"] {
            assert!(matches!(
                service.get_profile(Some(bad)),
                Err(ApiError::InvalidId(msg)) if msg == INVALID_USER_ID
            ));
        }
        assert!(matches!(
            service.get_profile(Some(&NodeId::generate().to_string())),
            Err(ApiError::InvalidId(_))
        ));
        let thread = service
            .start_thread(&alice, Some("Hello"), Some("World"))
            .unwrap();
        assert!(matches!(
            service.get_profile(Some(&thread.to_string())),
            Err(ApiError::InvalidId(_))
        ));
    }

    #[test]
    fn empty_update_mutates_nothing() {
        let (mut service, alice) = setup();
        let before = service.store().get_node(alice.user_id()).unwrap();
        let blank = ProfileUpdate {
            about: Some("  ".into()),
            ..update()
        };
        for candidate in [update(), blank] {
            match service.set_profile_on(&alice, &candidate, today()) {
                Err(ApiError::NoFieldsProvided(msg)) => assert_eq!(msg, NO_FIELD),
                other => panic!("expected NoFieldsProvided, got {:?}", other),
            }
        }
        assert_eq!(service.store().get_node(alice.user_id()).unwrap(), before);
    }

    #[test]
    fn fields_applied_in_fixed_order() {
        let (mut service, alice) = setup();
        let fields = service
            .set_profile_on(
                &alice,
                &ProfileUpdate {
                    about: Some("hi there".into()),
                    avatar: Some("https://example.com/me.png".into()),
                    birthday: Some("05/17/1990".into()),
                    username: Some("alice2".into()),
                },
                today(),
            )
            .unwrap();
        assert_eq!(
            fields,
            vec![
                UserField::Username,
                UserField::Birthday,
                UserField::Avatar,
                UserField::About
            ]
        );
        assert_eq!(
            fields_set_message(&fields),
            "Following fields set successfully: username, birthday, avatar, about"
        );

        let node = service.store().get_node(alice.user_id()).unwrap();
        let profile = node.as_user().unwrap();
        assert_eq!(profile.username, "alice2");
        assert_eq!(profile.birthday.as_deref(), Some("1990-05-17"));
        assert_eq!(profile.about.as_deref(), Some("hi there"));
    }

    #[test]
    fn birthday_accepted_on_thirteenth_birthday() {
        let (mut service, alice) = setup();
        let turning_thirteen = ProfileUpdate {
            birthday: Some("2011-06-01".into()),
            ..update()
        };
        let fields = service
            .set_profile_on(&alice, &turning_thirteen, today())
            .unwrap();
        assert_eq!(fields, vec![UserField::Birthday]);

        let one_day_short = ProfileUpdate {
            birthday: Some("2011-06-02".into()),
            ..update()
        };
        let err = service
            .set_profile_on(&alice, &one_day_short, today())
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == BIRTHDAY_INVALID));

        let node = service.store().get_node(alice.user_id()).unwrap();
        assert_eq!(node.as_user().unwrap().birthday.as_deref(), Some("2011-06-01"));
    }

    #[test]
    fn multi_field_update_on_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forum.db");
        let mut service = GraphService::new(path.to_str().unwrap()).unwrap();
        let alice = Caller::new(
            service
                .signup(Some("alice"), Some("alice@example.com"), Some("hunter2"))
                .unwrap(),
        );
        service
            .set_profile_on(
                &alice,
                &ProfileUpdate {
                    username: Some("alicia".into()),
                    about: Some("hello".into()),
                    ..update()
                },
                today(),
            )
            .unwrap();

        let node = service.store().get_node(alice.user_id()).unwrap();
        let profile = node.as_user().unwrap();
        assert_eq!(profile.username, "alicia");
        assert_eq!(profile.about.as_deref(), Some("hello"));
    }

    #[test]
    fn validation_order_is_avatar_birthday_username() {
        let (mut service, alice) = setup();
        let all_bad = ProfileUpdate {
            username: Some("bad name!".into()),
            birthday: Some("2020-01-01".into()),
            avatar: Some("not a url".into()),
            about: Some("kept out".into()),
        };
        let err = service.set_profile_on(&alice, &all_bad, today()).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == AVATAR_INVALID));

        let bad_birthday_and_name = ProfileUpdate {
            avatar: None,
            ..all_bad.clone()
        };
        let err = service
            .set_profile_on(&alice, &bad_birthday_and_name, today())
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == BIRTHDAY_INVALID));

        let bad_name = ProfileUpdate {
            avatar: None,
            birthday: None,
            ..all_bad
        };
        let err = service.set_profile_on(&alice, &bad_name, today()).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == USERNAME_INVALID));

        let node = service.store().get_node(alice.user_id()).unwrap();
        assert_eq!(node.as_user().unwrap().about, None);
    }

    #[test]
    fn username_conflict() {
        let (mut service, alice) = setup();
        service
            .signup(Some("bob"), Some("bob@example.com"), Some("hunter2"))
            .unwrap();
        let err = service
            .set_profile_on(
                &alice,
                &ProfileUpdate {
                    username: Some("bob".into()),
                    ..update()
                },
                today(),
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        // Re-setting one's own name is fine.
        let fields = service
            .set_profile_on(
                &alice,
                &ProfileUpdate {
                    username: Some("alice".into()),
                    ..update()
                },
                today(),
            )
            .unwrap();
        assert_eq!(fields, vec![UserField::Username]);
    }

    proptest! {
        #[test]
        fn applied_fields_follow_fixed_order(mask in 1u8..16) {
            let (mut service, alice) = setup();
            let pick = |bit: u8, value: &str| (mask & bit != 0).then(|| value.to_string());
            let partial = ProfileUpdate {
                username: pick(1, "alice"),
                birthday: pick(2, "1990-01-01"),
                avatar: pick(4, "https://example.com/a.png"),
                about: pick(8, "hello"),
            };
            let fields = service.set_profile_on(&alice, &partial, today()).unwrap();
            let expected: Vec<UserField> = [
                UserField::Username,
                UserField::Birthday,
                UserField::Avatar,
                UserField::About,
            ]
            .into_iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, field)| field)
            .collect();
            prop_assert_eq!(fields, expected);
        }
    }
}
