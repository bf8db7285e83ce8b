//! Study access and ownership predicates.
//!
//! Handlers call [`check_access`] or [`check_owner`] before touching a study.
//! The predicates are pure: they only look at the requester and the study
//! fields exposed through [`StudyAccess`].

use crate::error::CoreError;
use crate::levels::LEVEL_ADMIN;
use crate::study::StudyStatus;
use crate::types::DbId;

/// The user a request is made on behalf of.
#[derive(Debug, Clone, Copy)]
pub struct Requester<'a> {
    pub email: &'a str,
    pub level: &'a str,
}

impl<'a> Requester<'a> {
    pub fn new(email: &'a str, level: &'a str) -> Self {
        Self { email, level }
    }

    pub fn is_admin(&self) -> bool {
        self.level == LEVEL_ADMIN
    }
}

/// The subset of a study needed to decide access.
pub trait StudyAccess {
    fn study_id(&self) -> DbId;
    fn owner_email(&self) -> &str;
    fn shared_with(&self) -> &[String];
    fn status(&self) -> StudyStatus;
}

/// Returns `true` if `user` may see `study`.
///
/// Admins, the owner and users the study is shared with always have access.
/// Anyone else has access only to public studies, and only when `no_public`
/// is `false`.
pub fn has_access<S: StudyAccess + ?Sized>(user: &Requester<'_>, study: &S, no_public: bool) -> bool {
    if user.is_admin() || study.owner_email() == user.email {
        return true;
    }
    if study.shared_with().iter().any(|email| email == user.email) {
        return true;
    }
    !no_public && study.status() == StudyStatus::Public
}

/// Make sure `user` has access to `study`.
///
/// When access is denied and `no_public` is set, returns `Ok(false)` instead
/// of failing, so callers can use it as a capability probe (e.g. "may this
/// user upload?"). Otherwise denial is a [`CoreError::Forbidden`].
pub fn check_access<S: StudyAccess + ?Sized>(
    user: &Requester<'_>,
    study: &S,
    no_public: bool,
) -> Result<bool, CoreError> {
    if has_access(user, study, no_public) {
        return Ok(true);
    }
    if no_public {
        return Ok(false);
    }
    Err(CoreError::Forbidden(format!(
        "User {} does not have access to study {}",
        user.email,
        study.study_id()
    )))
}

/// Make sure `email` is the recorded owner of `study`.
pub fn check_owner<S: StudyAccess + ?Sized>(email: &str, study: &S) -> Result<(), CoreError> {
    if study.owner_email() != email {
        return Err(CoreError::Forbidden(format!(
            "User {email} does not own study {}",
            study.study_id()
        )));
    }
    Ok(())
}
