mod webhook;

pub use webhook::{
    AlertDispatcher, AlertStatus, AlertmanagerAlert, AlertmanagerWebhook, DispatchOutcome,
};
