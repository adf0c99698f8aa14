// Copyright (c) The vpw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8Path;
use camino_tempfile::Utf8TempDir;
use color_eyre::eyre::{Result, WrapErr};
use std::{
    collections::BTreeMap,
    io::{BufRead, BufReader, Write},
    net::{SocketAddr, TcpListener, TcpStream},
    sync::{Arc, Mutex, Once},
};

pub(crate) static LANG_GETAL_INPUT: &str = "8\n15\n99\n100\n997\n";
pub(crate) static LANG_GETAL_OUTPUT: &str = "1 8\n2 21\n3 189\n4 192\n5 2883\n";

pub(crate) fn test_init() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

/// Total number of digits needed to write out 1..=n.
pub(crate) fn total_digits(n: u64) -> u64 {
    (1..=n).map(|i| u64::from(i.ilog10() + 1)).sum()
}

/// A temporary base directory with fixtures under `src/`.
pub(crate) struct TempFixtures {
    dir: Utf8TempDir,
}

impl TempFixtures {
    pub(crate) fn new() -> Result<Self> {
        let dir = Utf8TempDir::new()?;
        std::fs::create_dir(dir.path().join("src"))?;
        Ok(Self { dir })
    }

    pub(crate) fn base_dir(&self) -> &Utf8Path {
        self.dir.path()
    }

    pub(crate) fn write(&self, name: &str, contents: &str) -> Result<()> {
        let path = self.dir.path().join("src").join(name);
        std::fs::write(&path, contents).wrap_err_with(|| format!("failed to write {path}"))
    }

    pub(crate) fn write_config(&self, contents: &str) -> Result<()> {
        let path = self.dir.path().join(".config/vpw.toml");
        std::fs::create_dir_all(self.dir.path().join(".config"))?;
        std::fs::write(&path, contents).wrap_err_with(|| format!("failed to write {path}"))
    }
}

/// A minimal HTTP/1.1 server that serves fixed bodies by path, and 404s
/// everything else. Each connection handles a single request.
pub(crate) struct FixtureServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FixtureServer {
    pub(crate) fn start(routes: BTreeMap<String, String>) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        let requests = Arc::new(Mutex::new(Vec::new()));

        let requests_ref = requests.clone();
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let _ = serve(stream, &routes, &requests_ref);
            }
        });

        Ok(Self { addr, requests })
    }

    pub(crate) fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn serve(
    stream: TcpStream,
    routes: &BTreeMap<String, String>,
    requests: &Mutex<Vec<String>>,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    // Drain headers.
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 || line == "\r\n" || line == "\n" {
            break;
        }
    }

    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_owned();
    requests.lock().unwrap().push(path.clone());

    let response = match routes.get(&path) {
        Some(body) => format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ),
        None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_owned(),
    };

    let mut stream = stream;
    stream.write_all(response.as_bytes())?;
    stream.flush()
}
