use async_trait::async_trait;

use super::{Command, CommandEnv};
use crate::ui::ToastType;

/// Copies text to the system clipboard and confirms with a toast.
pub struct CopyToClipboardCmd {
    text: String,
    toast_message: String,
}

impl CopyToClipboardCmd {
    pub fn new(text: impl Into<String>, toast_message: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            toast_message: toast_message.into(),
        }
    }
}

#[async_trait]
impl Command for CopyToClipboardCmd {
    fn name(&self) -> String {
        format!("Copying {}", self.toast_message)
    }

    async fn execute(self: Box<Self>, env: CommandEnv) -> color_eyre::Result<()> {
        env.set_clipboard(&self.text)?;
        env.show_toast(format!("Copied {}", self.toast_message), ToastType::Success);
        Ok(())
    }
}
