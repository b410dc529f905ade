//! One websocket connection: authenticated user, heartbeat, action dispatch.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::UserId;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;
use crate::ws::hub::{Deliver, WsRegistry};
use crate::ws::protocol::{ClientMsg, ServerMsg, PROTOCOL_VERSION};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

/// Start a session for a user whose token has already been verified.
pub fn start(
    req: &HttpRequest,
    stream: web::Payload,
    user_id: UserId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let registry = app_state.registry.clone();
    let session = WsSession {
        conn_id: Uuid::new_v4(),
        user_id,
        app_state,
        registry,
        last_heartbeat: Instant::now(),
        hello_done: false,
    };
    ws::start(session, req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    user_id: UserId,
    app_state: web::Data<AppState>,
    registry: Arc<WsRegistry>,
    last_heartbeat: Instant,
    hello_done: bool,
}

impl WsSession {
    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "failed to serialize outbound frame"),
        }
    }

    fn send_error(ctx: &mut ws::WebsocketContext<Self>, err: &AppError) {
        Self::send_json(
            ctx,
            &ServerMsg::Error {
                code: err.code(),
                message: err.public_detail(),
            },
        );
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(conn_id = %actor.conn_id, user_id = actor.user_id, "heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    /// Run an action against the services off the actor and report back:
    /// `ack` on success, an `error` frame to this connection on rejection.
    fn dispatch(&mut self, cmd: ClientMsg, ctx: &mut ws::WebsocketContext<Self>) {
        let state = self.app_state.clone();
        let user_id = self.user_id;
        let action = cmd.name();

        let fut = async move {
            match cmd {
                ClientMsg::Hello { .. } => Ok(()),
                ClientMsg::JoinHouse { house_id, seat } => {
                    state.houses.join_house(house_id, user_id, seat).await.map(drop)
                }
                ClientMsg::LeaveHouse { house_id } => {
                    state.houses.leave_house(house_id, user_id).await.map(drop)
                }
                ClientMsg::StartHand { house_id } => {
                    state.hands.start_hand(house_id, user_id).await.map(drop)
                }
                ClientMsg::PickOrPass { hand_id, pick } => {
                    state.hands.pick_or_pass(hand_id, user_id, pick).await.map(drop)
                }
                ClientMsg::Bury { hand_id, cards } => {
                    state.hands.bury(hand_id, user_id, &cards).await.map(drop)
                }
                ClientMsg::Call { hand_id, card } => {
                    state.hands.call(hand_id, user_id, card).await.map(drop)
                }
                ClientMsg::Play { hand_id, card } => {
                    state.hands.play(hand_id, user_id, card).await.map(drop)
                }
            }
        };

        ctx.spawn(fut.into_actor(self).map(move |res, actor, ctx| match res {
            Ok(()) => {
                debug!(conn_id = %actor.conn_id, user_id = actor.user_id, action, "action accepted");
                Self::send_json(
                    ctx,
                    &ServerMsg::Ack {
                        action: action.to_string(),
                    },
                );
            }
            Err(err) => {
                debug!(conn_id = %actor.conn_id, action, error = %err, "action rejected");
                Self::send_error(ctx, &err);
            }
        }));
    }

    fn handle_text(&mut self, text: &str, ctx: &mut ws::WebsocketContext<Self>) {
        let cmd = match serde_json::from_str::<ClientMsg>(text) {
            Ok(cmd) => cmd,
            Err(err) => {
                let err = AppError::invalid(
                    ErrorCode::MalformedPayload,
                    format!("Malformed message: {err}"),
                );
                Self::send_error(ctx, &err);
                return;
            }
        };

        if let ClientMsg::Hello { protocol } = cmd {
            if protocol != PROTOCOL_VERSION {
                let err = AppError::invalid(ErrorCode::BadRequest, "Unsupported protocol version");
                Self::send_error(ctx, &err);
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Policy)));
                ctx.stop();
                return;
            }
            self.hello_done = true;
            Self::send_json(
                ctx,
                &ServerMsg::HelloAck {
                    protocol: PROTOCOL_VERSION,
                    user_id: self.user_id,
                },
            );
            return;
        }

        if !self.hello_done {
            let err = AppError::invalid(ErrorCode::BadRequest, "Send hello first");
            Self::send_error(ctx, &err);
            return;
        }
        self.dispatch(cmd, ctx);
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, user_id = self.user_id, "session started");
        self.registry
            .register_connection(self.user_id, self.conn_id, ctx.address().recipient());
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.registry.unregister_connection(self.user_id, self.conn_id);
        info!(conn_id = %self.conn_id, user_id = self.user_id, "session stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) | Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                self.handle_text(&text, ctx);
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                let err = AppError::invalid(ErrorCode::MalformedPayload, "Binary frames are not supported");
                Self::send_error(ctx, &err);
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Err(err) => {
                warn!(conn_id = %self.conn_id, user_id = self.user_id, error = %err, "protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<Deliver> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: Deliver, ctx: &mut Self::Context) {
        ctx.text(msg.0.to_string());
    }
}
