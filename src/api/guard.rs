use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::api::error::ApiError;

/// Identity of the calling session, as asserted by the fronting
/// authentication layer
///
/// Authentication itself lives outside this service: a trusted proxy
/// terminates the session and installs two headers on forwarded
/// requests. `x-registry-user` carries the session's user label when
/// authenticated; `x-registry-write: 1` marks the write capability.
/// The registry only consumes the resulting booleans.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub authenticated: bool,
    pub may_write: bool,
}

impl Caller {
    /// Gate for mutating endpoints: authenticated session plus the
    /// write capability, checked in that order.
    pub fn require_write(&self) -> Result<(), ApiError> {
        if !self.authenticated {
            return Err(ApiError::Unauthenticated);
        }
        if !self.may_write {
            return Err(ApiError::Forbidden);
        }
        Ok(())
    }
}

impl FromRequest for Caller {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let authenticated = req.headers().contains_key("x-registry-user");
        let may_write = req
            .headers()
            .get("x-registry-write")
            .map(|value| value == "1")
            .unwrap_or(false);

        ready(Ok(Caller { authenticated, may_write }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::codes;

    #[test]
    fn anonymous_caller_is_rejected_before_capability_check() {
        let caller = Caller { authenticated: false, may_write: true };
        let err = caller.require_write().unwrap_err();
        assert_eq!(err.code(), codes::UNAUTHENTICATED);
    }

    #[test]
    fn read_only_caller_lacks_write_capability() {
        let caller = Caller { authenticated: true, may_write: false };
        let err = caller.require_write().unwrap_err();
        assert_eq!(err.code(), codes::WRITE_CAPABILITY_REQUIRED);
    }

    #[test]
    fn writer_passes_the_gate() {
        let caller = Caller { authenticated: true, may_write: true };
        assert!(caller.require_write().is_ok());
    }
}
