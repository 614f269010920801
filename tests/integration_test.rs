//! Tests de integración para el servidor de archivos estáticos
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor en un puerto efímero con un document
//! root temporal y habla con él por TCP.

use static_server::config::Config;
use static_server::server::{Server, ShutdownHandle};
use std::fs;
use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

static NEXT_ROOT: AtomicUsize = AtomicUsize::new(0);

/// Servidor corriendo en un thread aparte
struct TestServer {
    addr: SocketAddr,
    root: PathBuf,
    handle: ShutdownHandle,
    runner: Option<JoinHandle<Server>>,
}

impl TestServer {
    fn start(workers: usize) -> Self {
        let root = std::env::temp_dir().join(format!(
            "static_server_it_{}_{}",
            std::process::id(),
            NEXT_ROOT.fetch_add(1, Ordering::SeqCst)
        ));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("assets")).unwrap();
        fs::write(root.join("index.html"), "<h1>hi</h1>\n").unwrap();

        let config = Config {
            port: 0,
            document_root: root.clone(),
            workers,
            ..Config::default()
        };

        let server = Server::bind(&config).expect("bind");
        let addr = server.local_addr();
        let handle = server.shutdown_handle();
        let runner = thread::spawn(move || {
            server.run();
            server
        });

        Self {
            addr,
            root,
            handle,
            runner: Some(runner),
        }
    }

    /// Envía bytes crudos y retorna la respuesta completa
    fn send_raw(&self, raw: &[u8]) -> Vec<u8> {
        let mut stream = TcpStream::connect(self.addr).expect("connect");
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        stream.write_all(raw).unwrap();
        stream.flush().unwrap();

        let mut response = Vec::new();
        stream.read_to_end(&mut response).unwrap();
        response
    }

    fn get(&self, path: &str) -> HttpReply {
        HttpReply::parse(&self.send_raw(format!("GET {} HTTP/1.1\r\n\r\n", path).as_bytes()))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.stop();
        if let Some(runner) = self.runner.take() {
            if let Ok(server) = runner.join() {
                server.shutdown();
            }
        }
        let _ = fs::remove_dir_all(&self.root);
    }
}

/// Respuesta separada en status line, headers y body
#[derive(Debug, PartialEq, Eq)]
struct HttpReply {
    status_line: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl HttpReply {
    fn parse(raw: &[u8]) -> Self {
        let split = raw
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("response without header terminator");

        let head = String::from_utf8(raw[..split].to_vec()).unwrap();
        let mut lines = head.split("\r\n");
        let status_line = lines.next().unwrap().to_string();
        let headers = lines
            .filter_map(|line| line.split_once(": "))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Self {
            status_line,
            headers,
            body: raw[split + 4..].to_vec(),
        }
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[test]
fn test_get_index_example() {
    let server = TestServer::start(2);
    let reply = server.get("/");

    assert_eq!(reply.status_line, "HTTP/1.1 200 OK");
    assert_eq!(reply.header("Content-Type"), Some("text/html"));
    assert_eq!(reply.header("Content-Length"), Some("12"));
    assert_eq!(reply.header("Connection"), Some("close"));
    assert!(reply.header("Server").is_some());
    assert_eq!(reply.body, b"<h1>hi</h1>\n");
}

#[test]
fn test_root_equals_index_html() {
    let server = TestServer::start(2);
    assert_eq!(server.get("/"), server.get("/index.html"));
}

#[test]
fn test_binary_file_round_trip() {
    let server = TestServer::start(2);
    let content: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    fs::write(server.root.join("assets/blob.png"), &content).unwrap();

    let reply = server.get("/assets/blob.png");

    assert_eq!(reply.status_line, "HTTP/1.1 200 OK");
    assert_eq!(reply.header("Content-Type"), Some("image/png"));
    assert_eq!(reply.header("Content-Length"), Some("10000"));
    assert_eq!(reply.body, content);
}

#[test]
fn test_post_is_405() {
    let server = TestServer::start(2);
    let reply = HttpReply::parse(&server.send_raw(b"POST /index.html HTTP/1.1\r\n\r\n"));

    assert_eq!(reply.status_line, "HTTP/1.1 405 Method Not Allowed");
}

#[test]
fn test_missing_file_is_404() {
    let server = TestServer::start(2);
    let reply = server.get("/missing.txt");

    assert_eq!(reply.status_line, "HTTP/1.1 404 Not Found");
    assert_eq!(reply.header("Content-Type"), Some("text/html"));
}

#[test]
fn test_directory_is_404() {
    let server = TestServer::start(2);
    assert_eq!(server.get("/assets").status_line, "HTTP/1.1 404 Not Found");
}

#[test]
fn test_traversal_is_403_by_default() {
    let server = TestServer::start(2);
    let outside = server.root.with_extension("outside");
    fs::write(&outside, "nope").unwrap();

    let name = outside.file_name().unwrap().to_str().unwrap().to_string();
    let reply = server.get(&format!("/../{}", name));

    assert_eq!(reply.status_line, "HTTP/1.1 403 Forbidden");
    assert_eq!(reply.header("Content-Type"), Some("text/html"));
    let _ = fs::remove_file(outside);
}

#[test]
fn test_query_string_is_ignored() {
    let server = TestServer::start(2);
    fs::write(server.root.join("assets/style.css"), "body {}").unwrap();

    let reply = server.get("/assets/style.css?v=2");
    assert_eq!(reply.status_line, "HTTP/1.1 200 OK");
    assert_eq!(reply.header("Content-Type"), Some("text/css"));
    assert_eq!(reply.body, b"body {}");

    assert_eq!(server.get("/?x=1"), server.get("/index.html"));
}

#[test]
fn test_empty_stream_is_400() {
    let server = TestServer::start(2);

    let mut stream = TcpStream::connect(server.addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.shutdown(Shutdown::Write).unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).unwrap();

    assert!(response.starts_with(b"HTTP/1.1 400 Bad Request\r\n"));
}

#[test]
fn test_garbage_is_400() {
    let server = TestServer::start(2);
    let reply = HttpReply::parse(&server.send_raw(b"\r\n\r\n\x00\x01garbage"));

    assert_eq!(reply.status_line, "HTTP/1.1 400 Bad Request");
}

#[test]
fn test_header_case_does_not_matter() {
    let server = TestServer::start(2);

    let upper = server.send_raw(b"GET / HTTP/1.1\r\nContent-Type: text/plain\r\n\r\n");
    let lower = server.send_raw(b"GET / HTTP/1.1\r\ncontent-type: text/plain\r\n\r\n");

    assert_eq!(HttpReply::parse(&upper), HttpReply::parse(&lower));
}

#[test]
fn test_more_connections_than_workers() {
    let workers = 2;
    let clients = 24;
    let server = TestServer::start(workers);

    for i in 0..clients {
        fs::write(server.root.join(format!("file{}.txt", i)), format!("content of file {}", i))
            .unwrap();
    }

    let addr = server.addr;
    let threads: Vec<_> = (0..clients)
        .map(|i| {
            thread::spawn(move || {
                let mut stream = TcpStream::connect(addr).unwrap();
                stream.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
                stream
                    .write_all(format!("GET /file{}.txt HTTP/1.1\r\n\r\n", i).as_bytes())
                    .unwrap();

                let mut response = Vec::new();
                stream.read_to_end(&mut response).unwrap();
                (i, HttpReply::parse(&response))
            })
        })
        .collect();

    for t in threads {
        let (i, reply) = t.join().unwrap();
        // Cada conexión recibe exactamente su propio archivo
        assert_eq!(reply.status_line, "HTTP/1.1 200 OK");
        assert_eq!(reply.body, format!("content of file {}", i).into_bytes());
    }
}

#[test]
fn test_slow_client_does_not_block_others() {
    let server = TestServer::start(2);

    // Ocupa un worker sin mandar nada
    let _idle = TcpStream::connect(server.addr).unwrap();
    thread::sleep(Duration::from_millis(50));

    let reply = server.get("/");
    assert_eq!(reply.status_line, "HTTP/1.1 200 OK");
}

#[test]
fn test_stop_closes_listener() {
    let server = TestServer::start(1);
    let addr = server.addr;
    drop(server);

    assert!(TcpStream::connect_timeout(&addr, Duration::from_millis(500)).is_err());
}
