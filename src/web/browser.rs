//! Navigation through the system default browser

/// Opens URLs for the user
pub trait Browser: Send {
    fn open_url(&self, url: &str) -> std::io::Result<()>;
}

/// Delegates to the platform's default URL handler
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open_url(&self, url: &str) -> std::io::Result<()> {
        open::that(url)
    }
}
