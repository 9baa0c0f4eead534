//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener and client to verify frames actually
//! flow over the network, including sending to a connection while its
//! handler task is blocked in `recv` (the broadcast path).

#[cfg(feature = "websocket")]
mod websocket {
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use pokerplan_transport::{Connection, Transport, WebSocketTransport};
    use tokio_tungstenite::tungstenite::Message;

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn connect_client(addr: &str) -> ClientWs {
        let url = format!("ws://{addr}");
        let (ws, _) = tokio_tungstenite::connect_async(&url)
            .await
            .expect("client should connect");
        ws
    }

    async fn bind_and_accept() -> (ClientWs, pokerplan_transport::WebSocketConnection)
    {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("local addr").to_string();

        let accept = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });
        let client = connect_client(&addr).await;
        let conn = accept.await.expect("accept task");
        (client, conn)
    }

    #[tokio::test]
    async fn test_accept_and_receive_text_frame() {
        let (mut client, conn) = bind_and_accept().await;

        client
            .send(Message::Text("hello".into()))
            .await
            .expect("client send");

        let frame = conn.recv().await.expect("recv").expect("open");
        assert_eq!(frame, b"hello");
    }

    #[tokio::test]
    async fn test_send_reaches_client() {
        let (mut client, conn) = bind_and_accept().await;

        conn.send(b"{\"type\":\"room-updated\"}")
            .await
            .expect("server send");

        let msg = client.next().await.expect("frame").expect("ok");
        assert_eq!(
            msg.into_text().expect("text frame"),
            "{\"type\":\"room-updated\"}"
        );
    }

    #[tokio::test]
    async fn test_send_while_recv_is_pending() {
        // A clone of the connection must be able to send while the
        // original is parked in recv — this is what room broadcasts do.
        let (mut client, conn) = bind_and_accept().await;

        let reader = conn.clone();
        let recv_task =
            tokio::spawn(async move { reader.recv().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        conn.send(b"broadcast").await.expect("send during recv");

        let msg = client.next().await.expect("frame").expect("ok");
        assert_eq!(msg.into_text().expect("text"), "broadcast");

        client
            .send(Message::Text("done".into()))
            .await
            .expect("client send");
        let received = recv_task
            .await
            .expect("task")
            .expect("recv")
            .expect("open");
        assert_eq!(received, b"done");
    }

    #[tokio::test]
    async fn test_recv_returns_none_on_client_close() {
        let (mut client, conn) = bind_and_accept().await;

        client.close(None).await.expect("client close");

        let frame = conn.recv().await.expect("recv");
        assert!(frame.is_none());
    }

    #[tokio::test]
    async fn test_connection_ids_are_unique() {
        let (_c1, conn1) = bind_and_accept().await;
        let (_c2, conn2) = bind_and_accept().await;
        assert_ne!(conn1.id(), conn2.id());
    }
}
