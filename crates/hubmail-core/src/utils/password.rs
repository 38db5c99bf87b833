/// Random permanent-password generation for invited users
use crate::constants::{PASSWORD_DIGITS, PASSWORD_LOWERCASE, PASSWORD_SYMBOLS, PASSWORD_UPPERCASE};
use crate::error::HubmailError;
use rand::Rng;
use rand::seq::SliceRandom;

const CHAR_CLASSES: [&str; 4] = [
    PASSWORD_UPPERCASE,
    PASSWORD_LOWERCASE,
    PASSWORD_DIGITS,
    PASSWORD_SYMBOLS,
];

/// Generates a password with at least one character of every class.
///
/// The remaining positions draw uniformly from the union of all classes and
/// the result is shuffled, so the guaranteed characters land anywhere.
pub fn generate_password(length: usize) -> Result<String, HubmailError> {
    if length < CHAR_CLASSES.len() {
        return Err(HubmailError::Validation(format!(
            "Password length must be at least {}, got {}",
            CHAR_CLASSES.len(),
            length
        )));
    }

    Ok(build_password(length))
}

fn build_password(length: usize) -> String {
    let mut rng = rand::thread_rng();
    let all: Vec<char> = CHAR_CLASSES.iter().flat_map(|set| set.chars()).collect();

    let mut chars: Vec<char> = Vec::with_capacity(length);
    for set in CHAR_CLASSES {
        let set: Vec<char> = set.chars().collect();
        chars.push(set[rng.gen_range(0..set.len())]);
    }
    while chars.len() < length {
        chars.push(all[rng.gen_range(0..all.len())]);
    }
    chars.shuffle(&mut rng);

    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_PASSWORD_LENGTH;
    use std::collections::HashSet;

    fn has_every_class(password: &str) -> bool {
        CHAR_CLASSES
            .iter()
            .all(|set| password.chars().any(|c| set.contains(c)))
    }

    #[test]
    fn test_default_password_shape() {
        for _ in 0..1000 {
            let password = generate_password(DEFAULT_PASSWORD_LENGTH).unwrap();
            assert_eq!(password.chars().count(), DEFAULT_PASSWORD_LENGTH);
            assert!(has_every_class(&password), "missing class in {}", password);
        }
    }

    #[test]
    fn test_passwords_do_not_repeat() {
        let passwords: Vec<String> = (0..1000)
            .map(|_| generate_password(DEFAULT_PASSWORD_LENGTH).unwrap())
            .collect();
        assert!(passwords.windows(2).all(|pair| pair[0] != pair[1]));

        let unique: HashSet<&String> = passwords.iter().collect();
        assert!(unique.len() > 990);
    }

    #[test]
    fn test_custom_length() {
        let password = generate_password(24).unwrap();
        assert_eq!(password.chars().count(), 24);
        assert!(has_every_class(&password));

        let minimal = generate_password(4).unwrap();
        assert!(has_every_class(&minimal));
    }

    #[test]
    fn test_too_short_rejected() {
        assert!(matches!(
            generate_password(3),
            Err(HubmailError::Validation(_))
        ));
    }

    #[test]
    fn test_only_known_characters() {
        let allowed: HashSet<char> = CHAR_CLASSES.iter().flat_map(|s| s.chars()).collect();
        for _ in 0..200 {
            assert!(
                generate_password(DEFAULT_PASSWORD_LENGTH).unwrap()
                    .chars()
                    .all(|c| allowed.contains(&c))
            );
        }
    }
}
