//! skkserv protocol client.
//!
//! Requests are single lines without a newline: `1<word> ` looks up a
//! headword, `4<prefix> ` lists headwords with a prefix, `0` ends the
//! session. Responses are read up to the first `\n`; a leading `4` means
//! "not found", otherwise the payload is `1/cand1/cand2/`.

use std::io::{self, BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::Mutex;

use tracing::{debug, debug_span, warn};

use crate::encoding::TextEncoding;
use crate::kana::KanaTable;
use crate::settings::ServerSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    pub host: String,
    pub port: u16,
    pub request_encoding: TextEncoding,
    pub response_encoding: TextEncoding,
}

impl From<&ServerSettings> for ServerOptions {
    fn from(s: &ServerSettings) -> Self {
        Self {
            host: s.host.clone(),
            port: s.port,
            request_encoding: s.request_encoding,
            response_encoding: s.response_encoding,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("server unavailable: {0}")]
    Unavailable(#[from] io::Error),
    #[error("server closed the connection")]
    Closed,
}

struct Connection {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl Connection {
    fn open(opts: &ServerOptions) -> io::Result<Self> {
        let stream = TcpStream::connect((opts.host.as_str(), opts.port))?;
        let writer = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
        })
    }
}

/// One lazily opened connection, dropped on any error so the next request
/// reconnects.
pub struct SkkServer {
    opts: ServerOptions,
    conn: Mutex<Option<Connection>>,
}

impl SkkServer {
    pub fn new(opts: ServerOptions) -> Self {
        Self {
            opts,
            conn: Mutex::new(None),
        }
    }

    pub fn options(&self) -> &ServerOptions {
        &self.opts
    }

    /// Open the connection now instead of on the first request.
    pub fn connect(&self) -> Result<(), ServerError> {
        let mut guard = self.conn.lock().unwrap();
        if guard.is_none() {
            *guard = Some(Connection::open(&self.opts)?);
        }
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.conn.lock().unwrap().is_some()
    }

    /// Candidates for `word`; empty when not found or unreachable.
    pub fn lookup(&self, word: &str) -> Vec<String> {
        self.request_or_empty('1', word)
    }

    /// Headwords starting with `prefix`; empty when not found or unreachable.
    pub fn midashis(&self, prefix: &str) -> Vec<String> {
        self.request_or_empty('4', prefix)
    }

    /// Completion listing with romaji fan-out.
    ///
    /// With an empty `feed`, a single prefix query is made. Otherwise each
    /// kana entry whose key starts with `feed` contributes a query for
    /// `prefix + kana`, in table order. Every headword found is then looked up.
    pub fn completion(
        &self,
        prefix: &str,
        feed: &str,
        table: &KanaTable,
    ) -> Vec<(String, Vec<String>)> {
        let _span = debug_span!("server_completion", prefix, feed).entered();
        let midashis: Vec<String> = if feed.is_empty() {
            self.midashis(prefix)
        } else {
            table
                .alternatives(feed)
                .flat_map(|(_, kana)| self.midashis(&format!("{prefix}{kana}")))
                .collect()
        };
        midashis
            .into_iter()
            .map(|m| {
                let candidates = self.lookup(&m);
                (m, candidates)
            })
            .collect()
    }

    /// Send `0` and drop the connection.
    pub fn close(&self) {
        let mut guard = self.conn.lock().unwrap();
        if let Some(mut conn) = guard.take() {
            let bytes = self.opts.request_encoding.encode("0");
            if let Err(e) = conn.writer.write_all(&bytes) {
                debug!(error = %e, "failed to send close request");
            }
        }
    }

    fn request_or_empty(&self, opcode: char, text: &str) -> Vec<String> {
        match self.request(opcode, text) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, host = %self.opts.host, port = self.opts.port, "skkserv request failed");
                Vec::new()
            }
        }
    }

    fn request(&self, opcode: char, text: &str) -> Result<Vec<String>, ServerError> {
        let mut guard = self.conn.lock().unwrap();
        if guard.is_none() {
            *guard = Some(Connection::open(&self.opts)?);
        }
        let Some(conn) = guard.as_mut() else {
            return Err(ServerError::Closed);
        };
        let result = exchange(conn, &self.opts, opcode, text);
        if result.is_err() {
            *guard = None;
        }
        result
    }
}

impl Drop for SkkServer {
    fn drop(&mut self) {
        self.close();
    }
}

fn exchange(
    conn: &mut Connection,
    opts: &ServerOptions,
    opcode: char,
    text: &str,
) -> Result<Vec<String>, ServerError> {
    let request = opts.request_encoding.encode(&format!("{opcode}{text} "));
    conn.writer.write_all(&request)?;
    conn.writer.flush()?;

    let mut line = Vec::new();
    if conn.reader.read_until(b'\n', &mut line)? == 0 {
        return Err(ServerError::Closed);
    }
    let response = opts.response_encoding.decode(&line);
    debug!(opcode = %opcode, text, response = response.trim_end(), "skkserv exchange");
    Ok(parse_response(&response))
}

/// Interior `/`-separated fields of a response; `4...` means not found.
pub fn parse_response(line: &str) -> Vec<String> {
    let line = line.trim_end_matches(['\n', '\r']);
    if line.is_empty() || line.starts_with('4') {
        return Vec::new();
    }
    let fields: Vec<&str> = line.split('/').collect();
    if fields.len() < 3 {
        return Vec::new();
    }
    fields[1..fields.len() - 1]
        .iter()
        .filter(|f| !f.is_empty())
        .map(|f| f.to_string())
        .collect()
}
