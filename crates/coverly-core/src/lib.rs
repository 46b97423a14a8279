//! State synchronization and dialog logic for the coverly panel.
//!
//! This crate sits between `coverly-api` and the terminal UI:
//!
//! - **[`Registry`]**: the in-memory devices and remotes. Fetches replace
//!   a mapping wholesale behind sequence-gated [`ReloadTicket`]s; push
//!   events patch single device positions in place.
//!
//! - **[`Panel`]**: the reducer. Owns the registry, the [`OperatorLog`] and
//!   the [`DialogController`]; [`Panel::update`] turns an [`Intent`] into
//!   state changes plus a list of [`Effect`]s.
//!
//! - **[`EffectRunner`]**: performs effects on spawned tasks through the
//!   [`CommandClient`] and sends the results back as intents.
//!
//! - **Dialog** ([`dialog`]): the shared configurable dialog with its
//!   two-state delete confirmation, as pure `transition` / `controls`
//!   functions plus a session holder.

pub mod channel;
pub mod client;
pub mod command;
pub mod config;
pub mod dialog;
pub mod effects;
pub mod error;
pub mod fill;
pub mod log;
pub mod model;
pub mod panel;
pub mod registry;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use channel::spawn_channel;
pub use client::{CommandClient, CommandOutcome};
pub use command::{Command, CommandTarget};
pub use config::PanelConfig;
pub use dialog::{Button, DialogController, DialogEvent, DialogOptions, Mode, SessionId};
pub use effects::EffectRunner;
pub use error::CoreError;
pub use fill::FillSplit;
pub use log::{LogLevel, LogLine, OperatorLog};
pub use model::{Device, DeviceId, DeviceLink, Remote, RemoteId};
pub use panel::{CommandStep, Effect, HelpTopic, Intent, LinkState, Panel, Report};
pub use registry::{Registry, ReloadKind, ReloadOutcome, ReloadTicket};
pub use view::{DeviceRow, RemoteRow, SelectOption};

// Wire types consumers need without depending on coverly-api directly.
pub use coverly_api::{ChannelEvent, DeviceAction, PushEvent, ReconnectConfig};
