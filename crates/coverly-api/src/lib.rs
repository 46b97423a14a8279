// coverly-api: Async Rust client for the shutter controller (REST + push channel)

pub mod client;
pub mod error;
pub mod models;
pub mod transport;
pub mod websocket;

pub use client::CoverClient;
pub use error::Error;
pub use models::{
    ActionReply, CommandReply, CommandRequest, DeviceAction, DeviceRecord, FileKind, MqttConfig,
    RemoteDeviceRef, RemoteRecord, UploadReply,
};
pub use transport::TransportConfig;
pub use websocket::{ChannelEvent, PushEvent, ReconnectConfig, WebSocketHandle};
