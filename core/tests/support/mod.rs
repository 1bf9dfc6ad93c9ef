// Minimal HTTP-stub for /score-testene: godtar én forbindelse per ferdig
// respons, i rekkefølge, og returnerer rå forespørsler til testen.
#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub struct StubServer {
    pub base_url: String,
    handle: JoinHandle<Vec<String>>,
}

impl StubServer {
    /// Vent til første forespørsel er besvart og returner den rå teksten.
    pub fn request(self) -> String {
        self.requests().remove(0)
    }

    /// Vent til alle svar er sendt og returner forespørslene i rekkefølge.
    pub fn requests(self) -> Vec<String> {
        self.handle.join().expect("stub thread panicked")
    }
}

pub fn json_response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

pub fn serve_once(status_line: &str, body: &str) -> StubServer {
    serve_raw(vec![json_response(status_line, body)])
}

/// Svar med hver rå respons på hver sin forbindelse.
pub fn serve_raw(responses: Vec<String>) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");

    let handle = thread::spawn(move || {
        let mut requests = Vec::new();
        for response in responses {
            let (mut stream, _) = listener.accept().expect("accept");
            requests.push(read_request(&mut stream));
            stream.write_all(response.as_bytes()).expect("write response");
            stream.flush().ok();
        }
        requests
    });

    StubServer {
        base_url: format!("http://{addr}"),
        handle,
    }
}

/// Adresse der ingen lytter (forbindelse nektes).
pub fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse().ok())
        .unwrap_or(0)
}

fn read_request(stream: &mut TcpStream) -> String {
    stream.set_read_timeout(Some(Duration::from_secs(2))).ok();
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..pos]).to_string();
            if buf.len() >= pos + 4 + content_length(&head) {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
