//! Participant identity
//!
//! The identity provider hands out an opaque id that stays stable for the session. Signing out
//! and back in rotates it, which is how a player starts over as a fresh participant.

use log::info;
use uuid::Uuid;

use crate::types::ParticipantId;

pub trait IdentityProvider: Send + Sync {
    /// Id of the signed-in participant, `None` after sign-out
    fn current(&self) -> Option<&ParticipantId>;

    fn sign_out(&mut self);

    /// Sign in (again) and return the new id
    fn sign_in(&mut self) -> ParticipantId;
}

/// Anonymous sign-in: every session gets a fresh random id
#[derive(Debug, Clone)]
pub struct AnonymousIdentity {
    current: Option<ParticipantId>,
}

impl AnonymousIdentity {
    /// Signed in from the start
    pub fn new() -> Self {
        let mut identity = Self { current: None };
        identity.sign_in();
        identity
    }
}

impl Default for AnonymousIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for AnonymousIdentity {
    fn current(&self) -> Option<&ParticipantId> {
        self.current.as_ref()
    }

    fn sign_out(&mut self) {
        if let Some(id) = self.current.take() {
            info!("participant {} signed out", id);
        }
    }

    fn sign_in(&mut self) -> ParticipantId {
        let id = ParticipantId::new(Uuid::new_v4().simple().to_string());
        info!("participant {} signed in", id);
        self.current = Some(id.clone());
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_stable_until_rotated() {
        let mut identity = AnonymousIdentity::new();
        let first = identity.current().cloned().unwrap();
        assert_eq!(identity.current(), Some(&first));

        identity.sign_out();
        assert!(identity.current().is_none());

        let second = identity.sign_in();
        assert_ne!(first, second);
        assert_eq!(identity.current(), Some(&second));
    }
}
