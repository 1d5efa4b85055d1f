use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate)]
/// Credentials submitted by the signin page.
pub struct SignInForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}
