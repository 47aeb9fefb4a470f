//! End-to-end tests: the relay is started in-process on an ephemeral port and
//! driven by real WebSocket clients.

use std::{net::SocketAddr, time::Duration};

use futures_util::{SinkExt, StreamExt};
use hiroba_server::{ServerConfig, ui::Server};
use serde_json::{Value, json};
use tokio::{net::TcpListener, net::TcpStream, time::timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const GRACE_PERIOD: Duration = Duration::from_millis(300);
const RECV_TIMEOUT: Duration = Duration::from_secs(3);

async fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = Server::new(ServerConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        grace_period: GRACE_PERIOD,
    });
    tokio::spawn(server.serve(listener, std::future::pending()));
    addr
}

/// Helper struct wrapping one WebSocket client
struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    connection_id: String,
}

impl TestClient {
    /// Connect and wait for the `connected` event
    async fn connect(addr: SocketAddr) -> Self {
        let (stream, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
        let mut client = Self {
            stream,
            connection_id: String::new(),
        };
        let data = client.recv_until("connected").await;
        client.connection_id = data["connectionId"].as_str().unwrap().to_string();
        client
    }

    async fn emit(&mut self, event: &str, data: Value) {
        let frame = json!({ "event": event, "data": data }).to_string();
        self.stream.send(Message::text(frame)).await.unwrap();
    }

    async fn join(&mut self, name: &str, client_id: Option<&str>) {
        let data = match client_id {
            Some(id) => json!({ "name": name, "clientId": id }),
            None => json!({ "name": name }),
        };
        self.emit("join", data).await;
        self.recv_until("history").await;
    }

    async fn next_event(&mut self, wait: Duration) -> Option<(String, Value)> {
        loop {
            let msg = timeout(wait, self.stream.next()).await.ok()??.ok()?;
            if let Message::Text(text) = msg {
                let frame: Value = serde_json::from_str(text.as_str()).unwrap();
                let event = frame["event"].as_str().unwrap().to_string();
                return Some((event, frame["data"].clone()));
            }
        }
    }

    /// Skip events until `event` arrives and return its data
    async fn recv_until(&mut self, event: &str) -> Value {
        loop {
            match self.next_event(RECV_TIMEOUT).await {
                Some((name, data)) if name == event => return data,
                Some(_) => continue,
                None => panic!("timed out waiting for '{}'", event),
            }
        }
    }

    /// Collect event names received within `wait`
    async fn events_within(&mut self, wait: Duration) -> Vec<String> {
        let mut names = Vec::new();
        while let Some((name, _)) = self.next_event(wait).await {
            names.push(name);
        }
        names
    }

    async fn close(mut self) {
        self.stream.close(None).await.unwrap();
    }
}

#[tokio::test]
async fn test_join_send_and_reconnect_within_grace_period() {
    // テスト項目: 参加・送信・猶予期間内の再接続・猶予期間切れの一連の流れ
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = TestClient::connect(addr).await;
    alice
        .emit("join", json!({ "name": "Alice", "clientId": "c-alice" }))
        .await;
    assert_eq!(alice.recv_until("history").await, json!([]));

    // when (操作): Bob が参加する
    let mut bob = TestClient::connect(addr).await;
    bob.emit("join", json!({ "name": "Bob", "clientId": "c-bob" }))
        .await;

    // then (期待する結果):
    assert_eq!(bob.recv_until("history").await, json!([]));
    assert_eq!(alice.recv_until("user-joined").await, json!("Bob"));

    // when (操作): Alice が送信する
    alice.emit("send", json!({ "payload": "hi" })).await;

    // then (期待する結果):
    assert_eq!(
        bob.recv_until("receive").await,
        json!({ "payload": "hi", "senderName": "Alice" })
    );

    // when (操作): Bob が切断し、猶予期間内に同じ clientId で戻る
    bob.close().await;
    let mut bob = TestClient::connect(addr).await;
    bob.emit("join", json!({ "name": "Bob", "clientId": "c-bob" }))
        .await;

    // then (期待する結果): 履歴が再送され、Alice には何も通知されない
    assert_eq!(
        bob.recv_until("history").await,
        json!([{ "senderName": "Alice", "payload": "hi" }])
    );
    let events = alice.events_within(GRACE_PERIOD * 2).await;
    assert!(!events.iter().any(|e| e == "user-left" || e == "user-joined"));

    // when (操作): Bob が切断して戻らない
    bob.close().await;

    // then (期待する結果): 猶予期間の経過後に user-left が届く
    assert_eq!(alice.recv_until("user-left").await, json!("Bob"));
    let directory = alice.recv_until("directory").await;
    assert_eq!(directory, json!([{ "id": alice.connection_id, "name": "Alice" }]));
}

#[tokio::test]
async fn test_private_message_reaches_only_target() {
    // テスト項目: プライベートメッセージは宛先の接続だけに届く
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = TestClient::connect(addr).await;
    let mut bob = TestClient::connect(addr).await;
    let mut carol = TestClient::connect(addr).await;
    alice.join("Alice", None).await;
    bob.join("Bob", None).await;
    carol.join("Carol", None).await;

    // when (操作):
    let target = bob.connection_id.clone();
    alice
        .emit("private-send", json!({ "targetId": target, "message": "psst" }))
        .await;

    // then (期待する結果):
    assert_eq!(
        bob.recv_until("private-receive").await,
        json!({
            "payload": "psst",
            "senderName": "Alice",
            "senderConnectionId": alice.connection_id,
        })
    );
    let events = carol.events_within(Duration::from_millis(200)).await;
    assert!(!events.iter().any(|e| e == "private-receive"));
}

#[tokio::test]
async fn test_rooms_file_and_typing() {
    // テスト項目: ルーム切替後はそのルームのメンバーにだけファイルと入力中通知が届く
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = TestClient::connect(addr).await;
    let mut bob = TestClient::connect(addr).await;
    let mut carol = TestClient::connect(addr).await;
    alice.join("Alice", None).await;
    bob.join("Bob", None).await;
    carol.join("Carol", None).await;
    bob.emit("switch-room", json!("random")).await;
    bob.recv_until("history").await;
    alice.emit("switch-room", json!("random")).await;
    alice.recv_until("history").await;
    assert_eq!(bob.recv_until("user-joined").await, json!("Alice"));

    // when (操作):
    alice.emit("typing", json!("Alice")).await;
    alice
        .emit(
            "file",
            json!({
                "file": "data:text/plain;base64,aGk=",
                "fileName": "notes.txt",
                "fileType": "text/plain",
            }),
        )
        .await;

    // then (期待する結果):
    assert_eq!(bob.recv_until("typing-indicator").await, json!("Alice"));
    assert_eq!(
        bob.recv_until("file").await,
        json!({
            "blob": "data:text/plain;base64,aGk=",
            "fileName": "notes.txt",
            "fileType": "text/plain",
            "senderName": "Alice",
        })
    );
    let events = carol.events_within(Duration::from_millis(200)).await;
    assert!(!events.iter().any(|e| e == "file" || e == "typing-indicator"));

    let detail: Value = reqwest::get(format!("http://{}/api/rooms/random", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["history"][0]["payload"], json!("[file] notes.txt"));
}

#[tokio::test]
async fn test_malformed_and_unregistered_events_are_ignored() {
    // テスト項目: 不正なフレームや join 前のイベントは無視され、接続は維持される
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = TestClient::connect(addr).await;
    let mut lurker = TestClient::connect(addr).await;
    alice.join("Alice", None).await;

    // when (操作):
    lurker
        .stream
        .send(Message::text("not json"))
        .await
        .unwrap();
    lurker.emit("send", json!("anyone?")).await;
    lurker.emit("send", json!({ "payload": "   " })).await;
    alice.emit("send", json!("")).await;

    // then (期待する結果):
    let events = alice.events_within(Duration::from_millis(200)).await;
    assert!(!events.iter().any(|e| e == "receive"));
    lurker.join("Lurker", None).await;
    assert_eq!(alice.recv_until("user-joined").await, json!("Lurker"));
}

#[tokio::test]
async fn test_http_api() {
    // テスト項目: HTTP API でルーム一覧・詳細・オンライン一覧が取得できる
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = TestClient::connect(addr).await;
    alice.join("Alice", Some("c-alice")).await;
    alice.emit("send", json!("hello")).await;
    let http = reqwest::Client::new();

    // when (操作): 送信が反映されるまで待つ
    let mut detail = Value::Null;
    for _ in 0..20 {
        detail = http
            .get(format!("http://{}/api/rooms/general", addr))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        if detail["history"].as_array().is_some_and(|h| !h.is_empty()) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }

    // then (期待する結果):
    let health: Value = http
        .get(format!("http://{}/api/health", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health, json!({ "status": "ok" }));

    assert_eq!(detail["name"], json!("general"));
    assert_eq!(detail["members"], json!([alice.connection_id]));
    assert_eq!(detail["history"][0]["senderName"], json!("Alice"));
    assert_eq!(detail["history"][0]["payload"], json!("hello"));

    let rooms: Value = http
        .get(format!("http://{}/api/rooms", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rooms[0]["name"], json!("general"));
    assert_eq!(rooms[0]["members"], json!(1));
    assert_eq!(rooms[0]["historySize"], json!(1));

    let directory: Value = http
        .get(format!("http://{}/api/directory", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        directory,
        json!([{ "id": alice.connection_id, "name": "Alice" }])
    );

    let missing = http
        .get(format!("http://{}/api/rooms/nowhere", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}
