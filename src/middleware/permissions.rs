use crate::error::AppError;
use crate::middleware::auth::AuthUser;

pub fn require_admin(auth: &AuthUser) -> Result<(), AppError> {
    if auth.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden("admin access required".to_string()))
    }
}

/// Owners may always touch their own records; admins may touch anyone's.
pub fn require_owner_or_admin(auth: &AuthUser, owner_id: &str) -> Result<(), AppError> {
    if auth.is_admin || auth.member_id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden("not your item".to_string()))
    }
}
