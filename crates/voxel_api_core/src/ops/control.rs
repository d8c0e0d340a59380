use crate::types::{EntityId, Request, Response};
use crate::{ApiClient, Result, Transport};

pub async fn turn_key<T: Transport>(
    client: &mut ApiClient<T>,
    entity_id: EntityId,
    on: bool,
) -> Result<Response> {
    client.call(&Request::turn_key(entity_id, on)).await
}

pub async fn move_entity<T: Transport>(
    client: &mut ApiClient<T>,
    entity_id: EntityId,
    delta: [f32; 3],
    units_per_second: f32,
) -> Result<Response> {
    client
        .call(&Request::move_entity(entity_id, delta, units_per_second))
        .await
}

pub async fn player_move<T: Transport>(
    client: &mut ApiClient<T>,
    position: [f32; 3],
    rotation: [f32; 3],
    units_per_second: f32,
) -> Result<Response> {
    client
        .call(&Request::player_move(position, rotation, units_per_second))
        .await
}

pub async fn unfocus_app<T: Transport>(client: &mut ApiClient<T>) -> Result<Response> {
    client.call(&Request::unfocus_window()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeServer;
    use crate::types::RequestPayload;
    use crate::{ApiError, MessageType};

    #[tokio::test]
    async fn test_turn_key_targets_entity() {
        let server = FakeServer::new().with_entity(3, None, None);
        let mut client = ApiClient::with_transport(server.clone());

        turn_key(&mut client, 3, true).await.unwrap();
        assert_eq!(server.last_request(), Some(Request::turn_key(3, true)));
    }

    #[tokio::test]
    async fn test_move_unknown_entity_fails() {
        let server = FakeServer::new();
        let mut client = ApiClient::with_transport(server);

        let err = move_entity(&mut client, 12, [0.0, 1.0, 0.0], 2.0)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::OperationFailed {
                operation: MessageType::Move,
                entity_id: 12
            }
        ));
    }

    #[tokio::test]
    async fn test_player_move_and_unfocus_are_global() {
        let server = FakeServer::new();
        let mut client = ApiClient::with_transport(server.clone());

        player_move(&mut client, [1.0, 2.0, 3.0], [0.0, 0.0, -1.0], 5.0)
            .await
            .unwrap();
        unfocus_app(&mut client).await.unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.entity_id == 0));
        assert_eq!(requests[1].payload, RequestPayload::UnfocusWindow);
    }
}
