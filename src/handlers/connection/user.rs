//! USER and PASS handlers.

use super::try_register;
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{Context, Handshake, PostRegHandler, PreRegHandler, UserRequest};
use crate::state::User;
use async_trait::async_trait;
use std::sync::Arc;
use tinyirc_proto::Message;

/// Handler for USER during registration.
///
/// `USER <username> <mode> <unused> :<realname>`
pub struct UserHandler;

#[async_trait]
impl PreRegHandler for UserHandler {
    async fn handle(
        &self,
        ctx: &mut Context<'_>,
        handshake: &mut Handshake,
        msg: &Message,
    ) -> HandlerResult {
        let (Some(username), Some(realname)) = (msg.param(0), msg.param(3)) else {
            return Err(HandlerError::NeedMoreParams("USER".to_string()));
        };
        if username.is_empty() {
            return Err(HandlerError::NeedMoreParams("USER".to_string()));
        }

        handshake.user = Some(UserRequest {
            username: username.to_string(),
            realname: realname.to_string(),
        });
        try_register(ctx, handshake)
    }
}

/// Handler for PASS during registration. The password is checked when
/// registration completes.
pub struct PassHandler;

#[async_trait]
impl PreRegHandler for PassHandler {
    async fn handle(
        &self,
        _ctx: &mut Context<'_>,
        handshake: &mut Handshake,
        msg: &Message,
    ) -> HandlerResult {
        if let Some(password) = msg.param(0) {
            handshake.password = Some(password.to_string());
        }
        Ok(())
    }
}

/// USER or PASS after registration.
pub struct ReregisterHandler;

#[async_trait]
impl PostRegHandler for ReregisterHandler {
    async fn handle(
        &self,
        _ctx: &mut Context<'_>,
        _user: &Arc<User>,
        _msg: &Message,
    ) -> HandlerResult {
        Err(HandlerError::AlreadyRegistered)
    }
}
