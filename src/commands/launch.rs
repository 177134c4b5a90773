use std::ffi::OsString;
use std::path::PathBuf;

use async_trait::async_trait;
use url::Url;

use super::{Command, CommandEnv};

/// Opens a file or a web link with the desktop's default application.
pub struct OpenCmd {
    target: OsString,
}

impl OpenCmd {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            target: path.into().into_os_string(),
        }
    }

    pub fn url(url: &Url) -> Self {
        Self {
            target: url.as_str().into(),
        }
    }
}

#[async_trait]
impl Command for OpenCmd {
    fn name(&self) -> String {
        format!("Opening {}", self.target.to_string_lossy())
    }

    async fn execute(self: Box<Self>, _env: CommandEnv) -> color_eyre::Result<()> {
        // The opener may wait on the launched program.
        let target = self.target;
        tokio::task::spawn_blocking(move || open::that(&target)).await??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_shows_target() {
        let url = Url::parse("https://example.com/datasheet.pdf").unwrap();
        assert_eq!(
            OpenCmd::url(&url).name(),
            "Opening https://example.com/datasheet.pdf"
        );
        assert_eq!(OpenCmd::file("out/items.csv").name(), "Opening out/items.csv");
    }
}
