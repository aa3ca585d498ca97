pub mod app_core;
mod async_runtime;
pub mod domain;
pub mod kernel;
pub mod persistence;
pub mod ports;
pub mod remote;
pub mod selection;
pub mod viewmodel;

pub use app_core::*;
pub use domain::{
    AppSettings, AppState, BrokerContext, DialogId, ModalOutcome, ModalPhase, ModalState,
    SubmissionId, ToggleControl,
};
pub use kernel::AppKernel;
pub use ports::*;
pub use selection::{CheckboxGroup, SelectionGroup, SelectionStore};
pub use viewmodel::*;
