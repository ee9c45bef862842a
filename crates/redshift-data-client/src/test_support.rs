//! Scripted transport for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use redshift_data_auth::Credentials;
use redshift_data_model::RedshiftDataOperation;

use crate::client::RedshiftDataClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::transport::{HttpRequest, HttpResponse, HttpSend};

/// Replays canned responses, routed by `X-Amz-Target`; requests without a
/// Data API target (STS) draw from a shared queue.
#[derive(Debug, Default)]
pub(crate) struct ScriptedSender {
    routed: Mutex<HashMap<RedshiftDataOperation, VecDeque<HttpResponse>>>,
    other: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedSender {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn respond(&self, op: RedshiftDataOperation, status: u16, body: &str) {
        self.routed
            .lock()
            .unwrap()
            .entry(op)
            .or_default()
            .push_back(response(status, body));
    }

    pub(crate) fn respond_other(&self, status: u16, body: &str) {
        self.other.lock().unwrap().push_back(response(status, body));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn requests_for(&self, op: RedshiftDataOperation) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| {
                r.header("x-amz-target")
                    .and_then(RedshiftDataOperation::from_target)
                    == Some(op)
            })
            .collect()
    }

    pub(crate) fn bodies_for(&self, op: RedshiftDataOperation) -> Vec<serde_json::Value> {
        self.requests_for(op)
            .iter()
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }
}

fn response(status: u16, body: &str) -> HttpResponse {
    HttpResponse::new(
        http::StatusCode::from_u16(status).unwrap(),
        body.as_bytes().to_vec(),
    )
}

#[async_trait::async_trait]
impl HttpSend for ScriptedSender {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let op = request
            .header("x-amz-target")
            .and_then(RedshiftDataOperation::from_target);
        self.requests.lock().unwrap().push(request);
        let next = match op {
            Some(op) => self
                .routed
                .lock()
                .unwrap()
                .get_mut(&op)
                .and_then(VecDeque::pop_front),
            None => self.other.lock().unwrap().pop_front(),
        };
        next.ok_or_else(|| ClientError::Http(format!("no scripted response for {op:?}")))
    }
}

pub(crate) fn test_credentials() -> Credentials {
    Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
        .with_session_token("session-token")
}

pub(crate) fn test_client(sender: &Arc<ScriptedSender>) -> RedshiftDataClient {
    RedshiftDataClient::with_sender(
        test_credentials(),
        ClientConfig::default(),
        Arc::clone(sender) as Arc<dyn HttpSend>,
    )
}
