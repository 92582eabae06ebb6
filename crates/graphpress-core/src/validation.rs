//! Field rules for user-supplied values.
//!
//! Each rule is a plain predicate; callers decide which error message to
//! attach. Regexes are compiled once and shared.

use std::sync::OnceLock;

use chrono::{Months, NaiveDate};
use regex::Regex;
use url::Url;

/// Maximum thread title length, in characters.
pub const TITLE_MAX_CHARS: usize = 80;

/// Minimum age in years for a profile birthday.
pub const MIN_AGE_YEARS: u32 = 13;

/// URL schemes accepted for avatars.
pub const AVATAR_SCHEMES: [&str; 3] = ["http", "https", "ftp"];

/// Accepted birthday input formats.
const BIRTHDAY_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_]{1,12}$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

fn password_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Unanchored: the password only has to contain a qualifying run.
    RE.get_or_init(|| {
        Regex::new(r"[0-9A-Za-z!@#$%_]{5,15}")
            .unwrap_or_else(|error| panic!("password regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

pub fn is_valid_username(username: &str) -> bool {
    username_regex().is_match(username)
}

pub fn is_valid_password(password: &str) -> bool {
    password_regex().is_match(password)
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// A thread title is non-empty and at most [`TITLE_MAX_CHARS`] characters.
pub fn is_valid_title(title: &str) -> bool {
    let len = title.chars().count();
    len > 0 && len <= TITLE_MAX_CHARS
}

/// An avatar is an absolute URL with a host, using one of [`AVATAR_SCHEMES`].
pub fn is_valid_avatar(avatar: &str) -> bool {
    match Url::parse(avatar) {
        Ok(url) => AVATAR_SCHEMES.contains(&url.scheme()) && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Parses a birthday in any of the accepted formats.
pub fn parse_birthday(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    BIRTHDAY_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
}

/// `birthday` is on or before `today` minus [`MIN_AGE_YEARS`].
pub fn birthday_is_old_enough(birthday: NaiveDate, today: NaiveDate) -> bool {
    match today.checked_sub_months(Months::new(MIN_AGE_YEARS * 12)) {
        Some(cutoff) => birthday <= cutoff,
        None => false,
    }
}

/// Combined birthday check against `today`.
pub fn is_valid_birthday(input: &str, today: NaiveDate) -> bool {
    parse_birthday(input)
        .map(|date| birthday_is_old_enough(date, today))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn usernames() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("a_b_9"));
        assert!(is_valid_username("twelve_chars"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("thirteen_char"));
        assert!(!is_valid_username("al ice"));
        assert!(!is_valid_username("alice!"));
    }

    #[test]
    fn passwords_need_one_qualifying_run() {
        assert!(is_valid_password("hunter2"));
        assert!(is_valid_password("a!b@c"));
        assert!(is_valid_password("  spaces around12345  "));
        assert!(!is_valid_password("abcd"));
        assert!(!is_valid_password("ab cd ef"));
        assert!(!is_valid_password(""));
    }

    #[test]
    fn emails() {
        assert!(is_valid_email("alice@example.com"));
        assert!(!is_valid_email("alice@example"));
        assert!(!is_valid_email("alice example@x.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn titles() {
        assert!(is_valid_title("Hello"));
        assert!(is_valid_title(&"x".repeat(TITLE_MAX_CHARS)));
        assert!(!is_valid_title(&"x".repeat(TITLE_MAX_CHARS + 1)));
        assert!(!is_valid_title(""));
        // Characters, not bytes.
        assert!(is_valid_title(&"é".repeat(TITLE_MAX_CHARS)));
    }

    #[test]
    fn avatars() {
        assert!(is_valid_avatar("https://example.com/a.png"));
        assert!(is_valid_avatar("http://example.com"));
        assert!(is_valid_avatar("ftp://files.example.com/me.jpg"));
        assert!(!is_valid_avatar("javascript:alert(1)"));
        assert!(!is_valid_avatar("example.com/a.png"));
        assert!(!is_valid_avatar("file:///etc/passwd"));
        assert!(!is_valid_avatar(""));
    }

    #[test]
    fn birthday_formats() {
        assert_eq!(parse_birthday("1990-05-17"), Some(date(1990, 5, 17)));
        assert_eq!(parse_birthday("05/17/1990"), Some(date(1990, 5, 17)));
        assert_eq!(parse_birthday("17.05.1990"), None);
        assert_eq!(parse_birthday("1990-02-30"), None);
    }

    #[test]
    fn birthday_cutoff_includes_the_thirteenth_birthday() {
        let today = date(2024, 6, 1);
        assert!(birthday_is_old_enough(date(2011, 5, 31), today));
        assert!(birthday_is_old_enough(date(2011, 6, 1), today));
        assert!(!birthday_is_old_enough(date(2011, 6, 2), today));
        assert!(!birthday_is_old_enough(date(2020, 1, 1), today));
        assert!(is_valid_birthday("2000-01-01", today));
        assert!(!is_valid_birthday("not a date", today));
    }

    #[test]
    fn leap_day_cutoff_clamps() {
        // 2024-02-29 minus 13 years clamps to 2011-02-28.
        let today = date(2024, 2, 29);
        assert!(birthday_is_old_enough(date(2011, 2, 28), today));
        assert!(!birthday_is_old_enough(date(2011, 3, 1), today));
    }
}
