//! Integration tests for the Unix-socket transport against a real socket.
//!
//! A scripted listener thread stands in for the control plane.

use hapctl::transport::{Transport, UnixSocket};
use hapctl::Error;
use std::io::{Read, Write};
use std::os::unix::net::UnixListener;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

/// Accepts one connection, asserts the received command line, sends the
/// scripted response, then closes the connection to signal end-of-response.
fn one_shot_server(listener: UnixListener, expect: &'static str, response: Vec<u8>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 256];
        let n = stream.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], expect.as_bytes());
        stream.write_all(&response).unwrap();
    })
}

#[test]
fn round_trip_reads_until_peer_close() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("admin.sock");
    let listener = UnixListener::bind(&path).unwrap();
    let server = one_shot_server(
        listener,
        "show info\n",
        b"Name: HAProxy\nVersion: 1.8.3\n".to_vec(),
    );

    let mut transport = UnixSocket::new(&path);
    let response = transport.execute("show info").unwrap();

    assert!(response.contains("Version: 1.8.3"));
    server.join().unwrap();
}

#[test]
fn responses_larger_than_one_chunk_are_reassembled() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("admin.sock");
    let listener = UnixListener::bind(&path).unwrap();

    let mut table = String::from("# pxname,svname,status,weight,scur\n");
    for i in 0..200 {
        table.push_str(&format!("www,web{},UP,1,0\n", i));
    }
    assert!(table.len() > 1024);
    let server = one_shot_server(listener, "show stat\n", table.clone().into_bytes());

    let mut transport = UnixSocket::new(&path);
    let response = transport.execute("show stat").unwrap();

    assert_eq!(response, table);
    server.join().unwrap();
}

#[test]
fn connect_failure_is_fatal_and_names_the_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.sock");

    let mut transport = UnixSocket::new(&path);
    let err = transport.execute("show stat").unwrap_err();

    match err {
        Error::Connect { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected Connect, got {:?}", other),
    }
}

#[test]
fn read_deadline_aborts_a_silent_peer() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("admin.sock");
    let listener = UnixListener::bind(&path).unwrap();

    // Accept and read the command, then hold the connection open without
    // ever responding or closing.
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 256];
        let _ = stream.read(&mut buf).unwrap();
        thread::sleep(Duration::from_millis(600));
    });

    let mut transport = UnixSocket::new(&path).with_timeout(Duration::from_millis(100));
    let err = transport.execute("show stat").unwrap_err();

    assert!(matches!(err, Error::Transport { .. }));
    server.join().unwrap();
}
