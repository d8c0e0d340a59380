//! End-to-end exchanges over a real ZeroMQ REQ/REP pair.
//!
//! A REP socket bound to an OS-assigned port plays the engine: it decodes each
//! request with the library's own codec and answers with a canned response.

use voxel_api_core::{
    codec, ops, ApiClient, ApiConfig, ApiError, Request, RequestPayload, Response,
};
use zeromq::{Socket, SocketRecv, SocketSend, ZmqMessage};

/// Binds a REP socket and answers `replies` in order, returning the decoded
/// requests once all replies were sent.
async fn spawn_engine(
    replies: Vec<Vec<u8>>,
) -> (String, tokio::task::JoinHandle<Vec<Request>>) {
    let mut socket = zeromq::RepSocket::new();
    let endpoint = socket
        .bind("tcp://127.0.0.1:0")
        .await
        .expect("should bind");

    let handle = tokio::spawn(async move {
        let mut seen = Vec::new();
        for reply in replies {
            let message = socket.recv().await.expect("should receive");
            let bytes = message.get(0).expect("one frame").to_vec();
            seen.push(codec::decode_request(&bytes).expect("valid request"));
            socket
                .send(ZmqMessage::from(reply))
                .await
                .expect("should reply");
        }
        seen
    });

    (endpoint.to_string(), handle)
}

#[tokio::test]
async fn test_add_voxels_over_zmq() {
    let (endpoint, engine) = spawn_engine(vec![codec::encode_response(&Response::ok())]).await;
    let mut client = ApiClient::connect(&ApiConfig::new(endpoint))
        .await
        .expect("should connect");

    let response = ops::voxels::add_voxels(&mut client, &[[0, 4, 4]], true, 2.0)
        .await
        .expect("add should succeed");
    assert!(response.success);

    let seen = engine.await.expect("engine task");
    assert_eq!(
        seen,
        vec![Request::add_voxels(vec![[0, 4, 4]], true, 2.0)]
    );

    client.close().await.expect("close");
    client.close().await.expect("second close is a no-op");
}

#[tokio::test]
async fn test_requests_are_answered_in_order() {
    let replies = vec![
        codec::encode_response(&Response::ok().with_action_id(7)),
        codec::encode_response(&Response::failed()),
    ];
    let (endpoint, engine) = spawn_engine(replies).await;
    let mut client = ApiClient::connect(&ApiConfig::new(endpoint))
        .await
        .expect("should connect");

    let action_id = ops::voxels::clear_voxels(&mut client, (3.0, -3.0), (0.0, 1.0), (1.0, 0.0))
        .await
        .expect("clear should be staged");
    assert_eq!(action_id, 7);

    let err = ops::voxels::confirm_action(&mut client, 8).await.unwrap_err();
    assert!(matches!(err, ApiError::OperationFailed { .. }));

    let seen = engine.await.expect("engine task");
    match &seen[0].payload {
        RequestPayload::ClearVoxels { x, .. } => {
            assert_eq!((x.min(), x.max()), (-3.0, 3.0));
        }
        other => panic!("unexpected payload {other:?}"),
    }
    assert_eq!(seen[1], Request::confirm_action(8));
}

#[tokio::test]
async fn test_unparsable_reply_is_a_decode_error() {
    let (endpoint, engine) = spawn_engine(vec![vec![0xff, 0xff, 0xff]]).await;
    let mut client = ApiClient::connect(&ApiConfig::new(endpoint))
        .await
        .expect("should connect");

    let err = client.send(&Request::create_entity()).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
    engine.await.expect("engine task");
}

#[tokio::test]
async fn test_invalid_endpoint_is_a_connection_error() {
    let err = ApiClient::connect(&ApiConfig::new("not-an-endpoint"))
        .await
        .unwrap_err();
    match err {
        ApiError::Connection { endpoint, .. } => assert_eq!(endpoint, "not-an-endpoint"),
        other => panic!("Expected Connection error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_refused_endpoint_fails_without_retrying() {
    // Grab a free port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("should bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);

    let endpoint = format!("tcp://127.0.0.1:{port}");
    let result = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        ApiClient::connect(&ApiConfig::new(endpoint.clone())),
    )
    .await
    .expect("connect should give up instead of retrying");

    match result.unwrap_err() {
        ApiError::Connection { endpoint: reported, .. } => assert_eq!(reported, endpoint),
        other => panic!("Expected Connection error, got {other:?}"),
    }
}
