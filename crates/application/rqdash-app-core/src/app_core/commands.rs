use rqdash_core::{CommandRequest, TableKind};

#[derive(Debug, Clone)]
pub enum AppCommand {
    // Confirmation dialog
    OpenDialog(CommandRequest),
    Confirm,
    CloseDialog,

    // Sidebar
    ToggleQueue(String),
    ToggleJobStatus(String),
    ReloadSidebar,

    // Dashboard
    SelectInstance(usize),
    ShowTable(TableKind),
}
