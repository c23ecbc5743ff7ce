use std::net::SocketAddr;
use std::path::PathBuf;

pub struct Config {
    pub data_dir: String,
    pub csv_dir: String,
    pub host: [u8; 4],
    pub port: u16,
    pub autosave: bool, // 每次修改后写回 Arrow 文件
}

impl Config {
    pub fn new() -> Self {
        Self {
            data_dir: "data".to_string(),
            csv_dir: "csv_files".to_string(),
            host: [0, 0, 0, 0],
            port: 8000,
            autosave: true,
        }
    }

    pub fn with_data_dir(mut self, dir: &str) -> Self {
        self.data_dir = dir.to_string();
        self
    }

    pub fn with_csv_dir(mut self, dir: &str) -> Self {
        self.csv_dir = dir.to_string();
        self
    }

    pub fn with_host(mut self, host: [u8; 4]) -> Self {
        self.host = host;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    /// Arrow snapshot of the whole catalog
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("stocks.arrow")
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
