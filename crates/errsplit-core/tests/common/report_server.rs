//! Minimal HTTP/1.1 server answering HEAD and GET for integration tests.
//!
//! Serves one report body with an optional `ETag`. The report can be swapped
//! while the server runs to simulate an upstream update, and GETs are counted
//! so tests can assert that the not-modified path never downloads.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Report {
    pub etag: Option<String>,
    pub body: Vec<u8>,
    pub head_status: u16,
    pub get_status: u16,
}

impl Report {
    /// 200 for both methods.
    pub fn ok(etag: Option<&str>, body: &[u8]) -> Self {
        Self {
            etag: etag.map(str::to_string),
            body: body.to_vec(),
            head_status: 200,
            get_status: 200,
        }
    }
}

pub struct ReportServer {
    pub url: String,
    report: Arc<Mutex<Report>>,
    gets: Arc<AtomicUsize>,
}

impl ReportServer {
    /// Starts a server in a background thread. It runs until the process exits.
    pub fn start(report: Report) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let report = Arc::new(Mutex::new(report));
        let gets = Arc::new(AtomicUsize::new(0));
        {
            let report = Arc::clone(&report);
            let gets = Arc::clone(&gets);
            thread::spawn(move || {
                for stream in listener.incoming().flatten() {
                    let snapshot = report.lock().unwrap().clone();
                    let gets = Arc::clone(&gets);
                    thread::spawn(move || handle(stream, &snapshot, &gets));
                }
            });
        }
        Self {
            url: format!("http://127.0.0.1:{}/reports/clint/errors.json", port),
            report,
            gets,
        }
    }

    /// Replace what subsequent requests see.
    pub fn set(&self, report: Report) {
        *self.report.lock().unwrap() = report;
    }

    /// Number of GET requests served so far.
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return None,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }
    String::from_utf8(data).ok()
}

fn handle(mut stream: TcpStream, report: &Report, gets: &AtomicUsize) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let request = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };
    let method = request.split_whitespace().next().unwrap_or("");
    let is_head = method.eq_ignore_ascii_case("HEAD");
    if !is_head {
        gets.fetch_add(1, Ordering::SeqCst);
    }

    let status = if is_head {
        report.head_status
    } else {
        report.get_status
    };
    let reason = if status == 200 { "OK" } else { "Error" };
    let body: &[u8] = if status == 200 {
        &report.body
    } else {
        b"upstream unavailable"
    };
    let etag = match &report.etag {
        Some(tag) => format!("ETag: {}\r\n", tag),
        None => String::new(),
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        status,
        reason,
        body.len(),
        etag
    );
    let _ = stream.write_all(head.as_bytes());
    if !is_head {
        let _ = stream.write_all(body);
    }
    let _ = stream.flush();
}
