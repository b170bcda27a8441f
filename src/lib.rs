// src/lib.rs
//! Client library for the warehouse administration backend: entity lists with
//! debounced search, typed gateways, table rendering and modal forms.

pub mod config;
pub mod controller;
pub mod entities;
pub mod error;
pub mod forms;
pub mod gateway;
pub mod models;
pub mod notify;
pub mod pagination;
pub mod session;
pub mod stats;
pub mod status;
pub mod table;
pub mod validator;

pub use controller::{ListController, ListState};
pub use entities::{Entity, EntityConfig, EntityKind};
pub use error::{ClientError, ClientResult};
pub use gateway::{ApiTransport, Gateway, HttpTransport, ResourceGateway};
pub use notify::{Notifier, Toast, ToastLevel};
pub use pagination::{ListQuery, Page, PageInfo};
pub use status::EntityStatus;
