use super::UserRole;

/// Everything the credential store needs to insert a user row.
///
/// The password arrives here already hashed; the store never sees plaintext.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub activation_token: Option<String>,
    pub activated: bool,
    pub role: UserRole,
}
