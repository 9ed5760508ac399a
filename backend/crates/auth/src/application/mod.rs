//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod current_user;
pub mod dev_admin;
pub mod github_login;
pub mod login;
pub mod logout;
pub mod manage_users;
pub mod register;
pub mod update_profile;

mod support;

// Re-exports
pub use config::AuthConfig;
pub use current_user::CurrentUserUseCase;
pub use dev_admin::{DevAdminOutput, DevAdminUseCase};
pub use github_login::{GithubLoginOutput, GithubLoginUseCase};
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use logout::{LogoutOutput, LogoutUseCase};
pub use manage_users::{ManageUsersUseCase, UserForm};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use update_profile::{UpdateProfileInput, UpdateProfileUseCase};
