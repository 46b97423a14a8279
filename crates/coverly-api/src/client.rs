// Controller HTTP client
//
// Wraps `reqwest::Client` with URL construction against the controller's
// `/api/` root and status/body handling. Every endpoint is an inherent
// method returning the decoded payload; higher layers decide how failures
// surface to the operator.

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{
    ActionReply, ActionRequest, CommandReply, CommandRequest, DeviceAction, DeviceRecord,
    FileKind, LastAddrReply, MqttConfig, RemoteRecord, UploadReply,
};
use crate::transport::TransportConfig;

/// Raw HTTP client for one shutter controller.
#[derive(Debug, Clone)]
pub struct CoverClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CoverClient {
    /// Create a client for the controller at `base_url` (e.g. `http://192.168.1.40`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, mut base_url: Url) -> Self {
        // `Url::join` replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for `/api/{path}` under the base URL.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("api/{path}"))?)
    }

    /// The push channel endpoint: `ws://host/ws` (or `wss://` behind TLS).
    pub fn ws_url(&self) -> Result<Url, Error> {
        let mut url = self.base_url.join("ws")?;
        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => return Err(Error::UnsupportedScheme(other.to_owned())),
        };
        url.set_scheme(scheme)
            .map_err(|()| Error::UnsupportedScheme(self.base_url.to_string()))?;
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn read(resp: reqwest::Response) -> Result<(StatusCode, String), Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;
        Ok((status, body))
    }

    fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
        serde_json::from_str(body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: body.to_owned(),
        })
    }

    /// Send a GET request and decode a successful JSON body.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.api_url(path)?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let (status, body) = Self::read(resp).await?;
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }
        Self::decode(&body)
    }

    /// Send a POST request with JSON body and return status plus raw body.
    async fn post(
        &self,
        path: &str,
        payload: &impl Serialize,
    ) -> Result<(StatusCode, String), Error> {
        let url = self.api_url(path)?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::read(resp).await
    }

    /// Decode a reply that carries a message even on error statuses.
    ///
    /// A non-success status with a decodable body yields the body; the
    /// caller marks it failed. An undecodable error body yields `Status`.
    fn decode_reply<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, Error> {
        match Self::decode(body) {
            Ok(reply) => Ok(reply),
            Err(e) if status.is_success() => Err(e),
            Err(_) => Err(Error::Status {
                status: status.as_u16(),
                body: body.to_owned(),
            }),
        }
    }

    // ── Registry endpoints ───────────────────────────────────────────

    /// `GET /api/devices`
    pub async fn list_devices(&self) -> Result<Vec<DeviceRecord>, Error> {
        self.get("devices").await
    }

    /// `GET /api/remotes`
    pub async fn list_remotes(&self) -> Result<Vec<RemoteRecord>, Error> {
        self.get("remotes").await
    }

    /// `GET /api/lastaddr`. An absent address reads as an empty string.
    pub async fn last_address(&self) -> Result<String, Error> {
        let reply: LastAddrReply = self.get("lastaddr").await?;
        Ok(reply.address.unwrap_or_default())
    }

    /// `GET /api/logs`
    pub async fn logs(&self) -> Result<Vec<String>, Error> {
        self.get("logs").await
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// `POST /api/command`
    ///
    /// A reply with a non-success HTTP status is always reported with
    /// `success == false`, whatever the body claims.
    pub async fn send_command(&self, request: &CommandRequest) -> Result<CommandReply, Error> {
        debug!(command = %request.command, "sending command");
        let (status, body) = self.post("command", request).await?;
        let mut reply: CommandReply = Self::decode_reply(status, &body)?;
        if !status.is_success() {
            reply.success = false;
        }
        Ok(reply)
    }

    /// `POST /api/action`
    pub async fn send_action(
        &self,
        device_id: &str,
        action: DeviceAction,
    ) -> Result<ActionReply, Error> {
        let request = ActionRequest {
            device_id: device_id.to_owned(),
            action,
        };
        let (status, body) = self.post("action", &request).await?;
        let reply: ActionReply = Self::decode_reply(status, &body)?;
        if status.is_success() {
            Ok(reply)
        } else {
            Err(Error::Status {
                status: status.as_u16(),
                body: reply.message.unwrap_or(body),
            })
        }
    }

    // ── MQTT settings ────────────────────────────────────────────────

    /// `GET /api/mqtt`
    pub async fn mqtt_config(&self) -> Result<MqttConfig, Error> {
        self.get("mqtt").await
    }

    /// `POST /api/mqtt`
    pub async fn update_mqtt_config(&self, config: &MqttConfig) -> Result<UploadReply, Error> {
        let (status, body) = self.post("mqtt", config).await?;
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }
        // Some firmware answers with an empty body.
        if body.trim().is_empty() {
            return Ok(UploadReply::default());
        }
        Self::decode(&body)
    }

    // ── File transfer ────────────────────────────────────────────────

    /// `GET /api/download/{devices|remotes}` as raw bytes.
    pub async fn download(&self, kind: FileKind) -> Result<Vec<u8>, Error> {
        let url = self.api_url(&format!("download/{}", kind.path_segment()))?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = resp.bytes().await.map_err(Error::Transport)?;
        Ok(bytes.to_vec())
    }

    /// `POST /api/upload/{devices|remotes}` as a multipart `file` field.
    pub async fn upload(
        &self,
        kind: FileKind,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<UploadReply, Error> {
        let url = self.api_url(&format!("upload/{}", kind.path_segment()))?;
        debug!(bytes = contents.len(), "POST {}", url);

        let part = reqwest::multipart::Part::bytes(contents).file_name(file_name.to_owned());
        let form = reqwest::multipart::Form::new().part("file", part);

        let resp = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(Error::Transport)?;
        let (status, body) = Self::read(resp).await?;
        let reply: UploadReply = Self::decode_reply(status, &body)?;
        if status.is_success() {
            Ok(reply)
        } else {
            Err(Error::Status {
                status: status.as_u16(),
                body: reply.message.unwrap_or(body),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> CoverClient {
        CoverClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn api_url_from_bare_host() {
        let c = client("http://192.168.1.40");
        assert_eq!(
            c.api_url("devices").unwrap().as_str(),
            "http://192.168.1.40/api/devices"
        );
    }

    #[test]
    fn api_url_keeps_path_prefix() {
        let c = client("http://proxy.local/shutters");
        assert_eq!(
            c.api_url("command").unwrap().as_str(),
            "http://proxy.local/shutters/api/command"
        );
    }

    #[test]
    fn ws_url_swaps_scheme() {
        assert_eq!(
            client("http://192.168.1.40:8080").ws_url().unwrap().as_str(),
            "ws://192.168.1.40:8080/ws"
        );
        assert_eq!(
            client("https://panel.example").ws_url().unwrap().as_str(),
            "wss://panel.example/ws"
        );
    }

    #[test]
    fn ws_url_rejects_foreign_scheme() {
        assert!(matches!(
            client("ftp://panel.example").ws_url(),
            Err(Error::UnsupportedScheme(_))
        ));
    }
}
