use super::errors::PasswordPolicyError;

/// Password strength policy.
///
/// A password is accepted when it has at least `min_length` characters and
/// contains an ASCII uppercase letter, an ASCII lowercase letter and an ASCII
/// digit. Other characters are allowed but never count towards a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    min_length: usize,
}

impl PasswordPolicy {
    pub const DEFAULT_MIN_LENGTH: usize = 6;

    /// Create the default policy (6 characters, mixed case, one digit).
    pub fn new() -> Self {
        Self {
            min_length: Self::DEFAULT_MIN_LENGTH,
        }
    }

    /// Create a policy with a custom minimum length.
    pub fn with_min_length(min_length: usize) -> Self {
        Self { min_length }
    }

    /// Check a plaintext password against the policy.
    ///
    /// # Errors
    /// * `TooShort` - Fewer characters than the minimum length
    /// * `MissingCharacterClass` - No uppercase, lowercase or digit character
    pub fn validate(&self, password: &str) -> Result<(), PasswordPolicyError> {
        let length = password.chars().count();
        if length < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min: self.min_length,
                actual: length,
            });
        }

        let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());

        if has_upper && has_lower && has_digit {
            Ok(())
        } else {
            Err(PasswordPolicyError::MissingCharacterClass)
        }
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_strong_password() {
        let policy = PasswordPolicy::new();
        assert!(policy.validate("Abcdef1").is_ok());
        assert!(policy.validate("Abc123").is_ok());
        assert!(policy.validate("P@ssw0rd!").is_ok());
    }

    #[test]
    fn test_rejects_short_password() {
        let policy = PasswordPolicy::new();
        assert_eq!(
            policy.validate("Ab1"),
            Err(PasswordPolicyError::TooShort { min: 6, actual: 3 })
        );
        assert_eq!(
            policy.validate(""),
            Err(PasswordPolicyError::TooShort { min: 6, actual: 0 })
        );
    }

    #[test]
    fn test_rejects_missing_character_classes() {
        let policy = PasswordPolicy::new();

        for password in ["abcdef1", "ABCDEF1", "Abcdefg", "123456", "abcdefgh"] {
            assert_eq!(
                policy.validate(password),
                Err(PasswordPolicyError::MissingCharacterClass),
                "{password} should be rejected"
            );
        }
    }

    #[test]
    fn test_non_ascii_letters_do_not_count_as_classes() {
        let policy = PasswordPolicy::new();

        for password in ["Äbcdef1", "ÄBCDEé1", "ÀÉÎÕÜ12", "abcdéf1"] {
            assert_eq!(
                policy.validate(password),
                Err(PasswordPolicyError::MissingCharacterClass),
                "{password} should be rejected"
            );
        }
        assert!(policy.validate("Äbcdef1A").is_ok());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let policy = PasswordPolicy::new();
        // 5 characters, 7 bytes
        assert!(matches!(
            policy.validate("Ää1bc"),
            Err(PasswordPolicyError::TooShort { actual: 5, .. })
        ));
    }

    #[test]
    fn test_custom_min_length() {
        let policy = PasswordPolicy::with_min_length(10);
        assert!(policy.validate("Abcdef1").is_err());
        assert!(policy.validate("Abcdefghi1").is_ok());
    }
}
