use super::UserRole;

/// Partial update applied by an administrator. `None` leaves the field as is.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub activated: Option<bool>,
}
