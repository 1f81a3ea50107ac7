use lazy_static::lazy_static;
use regex::Regex;

const PASSWORD_SYMBOLS: &str = "@$!%*?&";

pub const WEAK_PASSWORD: &str = "Password must be at least 8 characters long, include 1 uppercase letter, 1 number, and 1 special character.";

/// Shape check only: `local@domain.tld`, no whitespace and a single `@` per part.
pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// At least 8 characters with an uppercase letter, a digit and one of `@$!%*?&`.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}
