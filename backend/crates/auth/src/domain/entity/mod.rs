//! Domain Entities

pub mod activity;
pub mod oauth_account;
pub mod session;
pub mod user;

pub use activity::{ActivityAction, ActivityLogEntry, NewActivity};
pub use oauth_account::{OAuthAccount, OAuthIdentity};
pub use session::{NewSession, Session};
pub use user::{NewUser, User, UserChanges, UserProfile};
