//! Authentication primitives such as login credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{EmailAddress, FullName, UserValidationError};

/// Minimum accepted password length at registration.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when an auth payload value is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// The email failed [`EmailAddress`] validation.
    Email(UserValidationError),
    /// The full name failed [`FullName`] validation.
    FullName(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Password was shorter than [`PASSWORD_MIN`] characters.
    PasswordTooShort {
        /// Minimum accepted length in characters.
        min: usize,
    },
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) | Self::FullName(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for AuthValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is normalised like any stored address so lookups are
///   case-insensitive.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons. It is zeroised
///   on drop and exists only for the lifetime of the request.
///
/// # Examples
/// ```
/// use parley::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@example.com", "secret123").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password(), "secret123");
/// ```
#[derive(Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"..")
            .finish()
    }
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    ///
    /// Login does not apply the registration password policy: a stored
    /// password predating a policy change must still be comparable.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = EmailAddress::new(email).map_err(AuthValidationError::Email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address suitable for user lookups.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request.
///
/// Registration and session establishment are separate transactions: a
/// successful registration does not log the user in, the client performs an
/// explicit login call afterwards.
#[derive(Clone)]
pub struct Registration {
    full_name: FullName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"..")
            .finish()
    }
}

impl Registration {
    /// Construct a registration from raw form inputs.
    pub fn try_from_parts(
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, AuthValidationError> {
        let full_name = FullName::new(full_name).map_err(AuthValidationError::FullName)?;
        let email = EmailAddress::new(email).map_err(AuthValidationError::Email)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(AuthValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }

        Ok(Self {
            full_name,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Full name supplied on the form.
    pub fn full_name(&self) -> &FullName {
        &self.full_name
    }

    /// Normalised email address to register.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password; hashed by the authenticator, never stored.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw12345678")]
    #[case("not-an-email", "pw12345678")]
    fn login_rejects_invalid_emails(#[case] email: &str, #[case] password: &str) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert!(matches!(err, AuthValidationError::Email(_)));
    }

    #[test]
    fn login_rejects_empty_passwords() {
        let err = LoginCredentials::try_from_parts("a@b.com", "")
            .expect_err("empty password must fail");
        assert_eq!(err, AuthValidationError::EmptyPassword);
    }

    #[test]
    fn login_accepts_short_passwords_predating_the_policy() {
        let creds = LoginCredentials::try_from_parts("a@b.com", "old")
            .expect("short passwords remain comparable at login");
        assert_eq!(creds.password(), "old");
    }

    #[rstest]
    #[case("A B", "a@b.com", "secret123")]
    #[case("Анна", "anna@example.org", "correct horse battery staple")]
    fn registration_accepts_valid_forms(
        #[case] full_name: &str,
        #[case] email: &str,
        #[case] password: &str,
    ) {
        let registration = Registration::try_from_parts(full_name, email, password)
            .expect("valid form should pass");
        assert_eq!(registration.full_name().as_ref(), full_name);
        assert_eq!(registration.password(), password);
    }

    #[rstest]
    #[case("", "a@b.com", "secret123")]
    fn registration_rejects_blank_names(
        #[case] full_name: &str,
        #[case] email: &str,
        #[case] password: &str,
    ) {
        let err = Registration::try_from_parts(full_name, email, password)
            .expect_err("blank name must fail");
        assert!(matches!(err, AuthValidationError::FullName(_)));
    }

    #[test]
    fn registration_enforces_the_password_minimum() {
        let err = Registration::try_from_parts("A B", "a@b.com", "short")
            .expect_err("short password must fail");
        assert_eq!(
            err,
            AuthValidationError::PasswordTooShort { min: PASSWORD_MIN }
        );
    }
}
