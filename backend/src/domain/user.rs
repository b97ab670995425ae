//! User data model.
//!
//! Purpose: strongly typed identity primitives for the credential store.
//! Constructors validate and normalise raw input so the rest of the crate can
//! rely on the invariants documented on each type.

use std::fmt;

use uuid::Uuid;

/// Validation errors returned by the user type constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The identifier was empty.
    EmptyId,
    /// The identifier was not a valid UUID.
    InvalidId,
    /// The email address was empty once trimmed.
    EmptyEmail,
    /// The email address was not structurally valid.
    InvalidEmail,
    /// The email address exceeded the storage limit.
    EmailTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
    /// The full name was empty once trimmed.
    EmptyFullName,
    /// The full name exceeded the storage limit.
    FullNameTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
    /// The full name contained control characters.
    FullNameInvalidCharacters,
    /// The contact handle was empty once trimmed.
    EmptyContactHandle,
    /// The contact handle exceeded the storage limit.
    ContactHandleTooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },
    /// The contact handle contained interior whitespace.
    ContactHandleWhitespace,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmailTooLong { max } => {
                write!(f, "email must be at most {max} characters")
            }
            Self::EmptyFullName => write!(f, "full name must not be empty"),
            Self::FullNameTooLong { max } => {
                write!(f, "full name must be at most {max} characters")
            }
            Self::FullNameInvalidCharacters => {
                write!(f, "full name must not contain control characters")
            }
            Self::EmptyContactHandle => write!(f, "contact handle must not be empty"),
            Self::ContactHandleTooLong { max } => {
                write!(f, "contact handle must be at most {max} characters")
            }
            Self::ContactHandleWhitespace => {
                write!(f, "contact handle must not contain whitespace")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Maximum accepted length for an email address.
pub const EMAIL_MAX: usize = 254;

/// Lower-cased, structurally validated email address.
///
/// ## Invariants
/// - Trimmed of surrounding whitespace and lower-cased on construction, so
///   two addresses differing only in case compare equal.
/// - Exactly one `@` separating a non-empty local part from a domain that
///   contains at least one dot and no whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate, normalise, and construct an [`EmailAddress`].
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = email.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }

        let Some((local, domain)) = normalised.split_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        if local.is_empty()
            || domain.is_empty()
            || domain.contains('@')
            || !domain.contains('.')
            || normalised.chars().any(char::is_whitespace)
        {
            return Err(UserValidationError::InvalidEmail);
        }

        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Maximum accepted length for a full name.
pub const FULL_NAME_MAX: usize = 100;

/// Human readable full name supplied at registration.
///
/// Unlike ASCII-only identifiers this accepts any script, because names
/// arrive from the registration form as typed by the user. Control
/// characters are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName(String);

impl FullName {
    /// Validate and construct a [`FullName`] from raw input.
    pub fn new(full_name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = full_name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyFullName);
        }
        if trimmed.chars().count() > FULL_NAME_MAX {
            return Err(UserValidationError::FullNameTooLong { max: FULL_NAME_MAX });
        }
        if trimmed.chars().any(char::is_control) {
            return Err(UserValidationError::FullNameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Maximum accepted length for a contact handle.
pub const CONTACT_HANDLE_MAX: usize = 64;

/// Optional messaging handle attached to a profile, e.g. a Telegram handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactHandle(String);

impl ContactHandle {
    /// Validate and construct a [`ContactHandle`] from raw input.
    pub fn new(handle: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = handle.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyContactHandle);
        }
        if trimmed.chars().count() > CONTACT_HANDLE_MAX {
            return Err(UserValidationError::ContactHandleTooLong {
                max: CONTACT_HANDLE_MAX,
            });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(UserValidationError::ContactHandleWhitespace);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ContactHandle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ContactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Salted one-way password hash in PHC string format.
///
/// The wrapped string is an argon2 output such as `$argon2id$v=19$...`; it is
/// never the plaintext password. Construction does not re-validate the PHC
/// grammar, verification does.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHashString(String);

impl PasswordHashString {
    /// Wrap an encoded hash produced by the password service or loaded from
    /// the credential store.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Borrow the encoded hash.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHashString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHashString(..)")
    }
}

/// Application user as held by the credential store.
///
/// ## Invariants
/// - `email` is unique across all users; the store enforces this.
/// - `password_hash` is always a salted one-way hash, never plaintext.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    full_name: FullName,
    contact_handle: Option<ContactHandle>,
    password_hash: PasswordHashString,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(
        id: UserId,
        email: EmailAddress,
        full_name: FullName,
        contact_handle: Option<ContactHandle>,
        password_hash: PasswordHashString,
    ) -> Self {
        Self {
            id,
            email,
            full_name,
            contact_handle,
            password_hash,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Unique, lower-cased email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Full name supplied at registration.
    pub fn full_name(&self) -> &FullName {
        &self.full_name
    }

    /// Optional contact handle from the profile.
    pub fn contact_handle(&self) -> Option<&ContactHandle> {
        self.contact_handle.as_ref()
    }

    /// Stored password hash.
    pub fn password_hash(&self) -> &PasswordHashString {
        &self.password_hash
    }
}
