//! TCP controller client
//!
//! The session and the motion services it hands out share one
//! [`JsonLineChannel`] behind an async mutex, so calls never interleave.

use std::sync::Arc;

use armscribe_core::{ConnectionError, Error, MotionError, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::protocol::{JsonLineChannel, Reply};
use super::{
    Credentials, MotionConstraints, MotionService, MoveRequest, MoveResult, PoseInFrame,
    RobotConnection, RobotConnector,
};

type SharedChannel = Arc<Mutex<Option<JsonLineChannel>>>;

/// Connector that dials controllers over TCP
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

#[async_trait]
impl RobotConnector for TcpConnector {
    async fn connect(
        &self,
        address: &str,
        credentials: &Credentials,
    ) -> Result<Box<dyn RobotConnection>> {
        let client = TcpRobotClient::connect(address, credentials).await?;
        Ok(Box::new(client))
    }
}

/// An authenticated TCP session
pub struct TcpRobotClient {
    channel: SharedChannel,
    address: String,
}

impl TcpRobotClient {
    /// Dial `address` and authenticate with `credentials`
    pub async fn connect(address: &str, credentials: &Credentials) -> Result<Self> {
        info!("Connecting to robot at {}", address);
        let channel = JsonLineChannel::connect(address).await?;
        Self::authenticate(channel, credentials).await
    }

    /// Authenticate over an already established channel
    pub async fn authenticate(
        mut channel: JsonLineChannel,
        credentials: &Credentials,
    ) -> Result<Self> {
        let address = channel.peer().to_string();
        let reply = channel
            .call(
                "authenticate",
                json!({
                    "type": "api-key",
                    "key_id": credentials.key_id(),
                    "key": credentials.secret(),
                }),
            )
            .await?;

        if let Reply::Refused(reason) = reply {
            return Err(ConnectionError::AuthenticationFailed {
                key_id: credentials.key_id().to_string(),
                reason,
            }
            .into());
        }

        info!(key_id = credentials.key_id(), "Authenticated with {}", address);
        Ok(Self {
            channel: Arc::new(Mutex::new(Some(channel))),
            address,
        })
    }

    /// Address of the controller
    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl RobotConnection for TcpRobotClient {
    async fn motion_service(&self, name: &str) -> Result<Arc<dyn MotionService>> {
        let mut guard = self.channel.lock().await;
        let channel = guard.as_mut().ok_or(ConnectionError::Closed)?;

        match channel
            .call("resource", json!({ "kind": "motion", "name": name }))
            .await?
        {
            Reply::Ok(_) => {
                debug!("Resolved motion service {}", name);
                Ok(Arc::new(TcpMotionService {
                    name: name.to_string(),
                    channel: Arc::clone(&self.channel),
                }))
            }
            Reply::Refused(reason) => {
                debug!("Motion service lookup failed: {}", reason);
                Err(ConnectionError::ServiceNotFound {
                    name: name.to_string(),
                }
                .into())
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        let Some(mut channel) = self.channel.lock().await.take() else {
            return Ok(());
        };

        match channel.call("close", json!({})).await {
            Ok(_) => info!("Closed connection to {}", self.address),
            Err(e) => warn!("Connection to {} did not close cleanly: {}", self.address, e),
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct MoveParams<'a> {
    service: &'a str,
    component: &'a str,
    destination: &'a PoseInFrame,
    #[serde(skip_serializing_if = "Option::is_none")]
    constraints: Option<&'a MotionConstraints>,
}

/// Motion service reached through a TCP session
pub struct TcpMotionService {
    name: String,
    channel: SharedChannel,
}

#[async_trait]
impl MotionService for TcpMotionService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn move_to(&self, request: &MoveRequest) -> Result<MoveResult> {
        let mut guard = self.channel.lock().await;
        let channel = guard.as_mut().ok_or(ConnectionError::Closed)?;

        let params = MoveParams {
            service: &self.name,
            component: &request.component,
            destination: &request.destination,
            constraints: request.constraints.as_ref(),
        };

        match channel.call("motion.move", params).await? {
            Reply::Ok(value) if value.is_null() => Ok(MoveResult {
                moved: true,
                execution_id: None,
            }),
            Reply::Ok(value) => serde_json::from_value(value).map_err(|e| {
                Error::from(ConnectionError::Protocol {
                    reason: format!("malformed move result: {}", e),
                })
            }),
            Reply::Refused(reason) => Err(MotionError::Rejected { reason }.into()),
        }
    }
}
