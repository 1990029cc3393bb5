//! FTP access to the dbGaP study tree
//!
//! Sessions are short-lived: connect, log in, run a single command, quit.
//! suppaftp's synchronous stream runs on a blocking task so callers stay async.
//!
//! The read timeout applies to the control socket from the server greeting on
//! and to the RETR data socket. A whole session is also bounded by the connect
//! plus read timeout, which covers LIST transfers whose data socket suppaftp
//! keeps internal.

use super::StudyDownloader;
use crate::config::DbgapConfig;
use async_trait::async_trait;
use dbgap_common::{DbgapError, Result};
use std::io::Read;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;
use suppaftp::FtpStream;
use tracing::{debug, info, warn};

/// FTP downloader for the dbGaP archive
#[derive(Debug, Clone)]
pub struct FtpDownloader {
    host: String,
    port: u16,
    username: String,
    password: String,
    connection_timeout: Duration,
    read_timeout: Duration,
}

impl FtpDownloader {
    pub fn from_config(config: &DbgapConfig) -> Self {
        Self {
            host: config.ftp_host.clone(),
            port: config.ftp_port,
            username: config.ftp_username.clone(),
            password: config.ftp_password.clone(),
            connection_timeout: Duration::from_secs(config.connection_timeout_secs),
            read_timeout: Duration::from_secs(config.read_timeout_secs),
        }
    }

    /// Run `op` against a logged-in session on a blocking thread
    async fn with_session<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut FtpStream) -> Result<T> + Send + 'static,
    {
        let this = self.clone();
        let deadline = self.connection_timeout + self.read_timeout;
        let session = tokio::task::spawn_blocking(move || {
            let mut stream = this.connect()?;
            let result = op(&mut stream);

            if let Err(e) = stream.quit() {
                warn!("Failed to quit FTP session gracefully: {}", e);
            }
            result
        });

        match tokio::time::timeout(deadline, session).await {
            Ok(joined) => {
                joined.map_err(|e| DbgapError::network(format!("FTP task panicked: {}", e)))?
            },
            Err(_) => Err(DbgapError::network(format!(
                "FTP session with {}:{} timed out after {:?}",
                self.host, self.port, deadline
            ))),
        }
    }

    fn connect(&self) -> Result<FtpStream> {
        let addr = self.resolve()?;
        debug!("Connecting to FTP server: {}", addr);

        let socket = TcpStream::connect_timeout(&addr, self.connection_timeout).map_err(|e| {
            DbgapError::network(format!("Failed to connect to {}:{}: {}", self.host, self.port, e))
        })?;
        socket.set_read_timeout(Some(self.read_timeout))?;
        socket.set_write_timeout(Some(self.read_timeout))?;

        let mut stream = FtpStream::connect_with_stream(socket).map_err(|e| {
            DbgapError::network(format!("No FTP greeting from {}:{}: {}", self.host, self.port, e))
        })?;

        // Extended passive mode copes with NAT and container networking
        stream.set_mode(suppaftp::Mode::ExtendedPassive);

        debug!("Logging in as: {}", self.username);
        stream
            .login(&self.username, &self.password)
            .map_err(|e| DbgapError::network(format!("FTP login failed: {}", e)))?;

        stream
            .transfer_type(suppaftp::types::FileType::Binary)
            .map_err(|e| DbgapError::network(format!("Failed to set binary mode: {}", e)))?;

        Ok(stream)
    }

    fn resolve(&self) -> Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                DbgapError::network(format!("No address found for {}:{}", self.host, self.port))
            })
    }
}

#[async_trait]
impl StudyDownloader for FtpDownloader {
    async fn download(&self, path: &str) -> Result<String> {
        let owned = path.to_string();
        let read_timeout = self.read_timeout;
        let data = self
            .with_session(move |stream| {
                debug!("Downloading file: {}", owned);
                let mut reader = stream.retr_as_stream(&owned).map_err(|e| {
                    DbgapError::network(format!("Failed to download {}: {}", owned, e))
                })?;
                reader.get_ref().set_read_timeout(Some(read_timeout))?;

                let mut data = Vec::new();
                reader.read_to_end(&mut data)?;
                stream.finalize_retr_stream(reader).map_err(|e| {
                    DbgapError::network(format!("Failed to complete download of {}: {}", owned, e))
                })?;
                Ok(data)
            })
            .await?;

        info!("Downloaded {} ({} bytes)", path, data.len());

        String::from_utf8(data)
            .map_err(|e| DbgapError::Parse(format!("{} is not valid UTF-8: {}", path, e)))
    }

    async fn list_files(&self, path: &str) -> Result<Vec<String>> {
        let owned = path.to_string();
        let lines = self
            .with_session(move |stream| {
                debug!("Listing directory: {}", owned);
                stream.list(Some(owned.as_str())).map_err(|e| {
                    DbgapError::network(format!("Failed to list {}: {}", owned, e))
                })
            })
            .await?;

        let files: Vec<String> = lines
            .iter()
            .filter_map(|line| FtpEntry::parse(line))
            .filter(|entry| !entry.is_directory)
            .map(|entry| entry.name)
            .collect();

        info!("Listed {} ({} files)", path, files.len());
        Ok(files)
    }

    fn location(&self) -> String {
        format!("ftp://{}:{}", self.host, self.port)
    }
}

/// Parsed line of an FTP `LIST` response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpEntry {
    pub name: String,
    pub is_directory: bool,
    pub size: Option<u64>,
}

impl FtpEntry {
    /// Parse a Unix-style listing line:
    /// `-r--r--r--   1 ftp  anonymous  18432 Mar 02  2016 GapExchange_phs000007.v32.p13.xml`
    pub fn parse(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 9 {
            return None;
        }

        Some(Self {
            // Names may contain spaces; everything after the time/year column belongs to it
            name: parts[8..].join(" "),
            is_directory: parts[0].starts_with('d'),
            size: parts[4].parse().ok(),
        })
    }
}
