use email_address::EmailAddress;
use sha2::{Digest, Sha512};
use tracing::warn;

use crate::structs::register_user::RegisterUser;
use crate::utils::app_error::AppError;

pub fn check_username(username: &str) -> Result<(), AppError> {
    if username.len() < 3 || username.len() > 30 {
        warn!("Wrong username size : {username}");
        return Err(AppError::validation(
            "Username must contain between 3 and 30 characters.",
        ));
    }

    for (i, c) in username.char_indices() {
        if i == 0 {
            if !c.is_alphabetic() {
                warn!("The username has to begin with a letter : {username}");
                return Err(AppError::validation("Username must begin with a letter."));
            }
            continue;
        }
        if !c.is_alphanumeric() && c != '_' {
            warn!("The username has to contain only letters, digits and underscores : {username}");
            return Err(AppError::validation(
                "Username may only contain letters, digits and underscores.",
            ));
        }
    }

    Ok(())
}

pub fn check_email_address(email: &str) -> Result<(), AppError> {
    if !EmailAddress::is_valid(email) {
        warn!("Invalid email `{email}`");
        return Err(AppError::validation("Invalid email address."));
    }
    Ok(())
}

pub fn check_register_infos(user: &RegisterUser) -> Result<(), AppError> {
    check_username(&user.username)?;

    check_email_address(&user.email)?;

    check_password(&user.password)
}

pub fn check_password(password: &str) -> Result<(), AppError> {
    if password.len() < 5 {
        warn!("Password too short");
        return Err(AppError::validation(
            "Password must contain at least 5 characters.",
        ));
    }
    Ok(())
}

pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(password);
    format!("{:x}", hasher.finalize())
}
