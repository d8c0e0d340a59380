use crate::types::{Component, ComponentFilter, ComponentKind, EntityId, EntityInfo, Request, Response};
use crate::{ApiClient, ApiError, Result, Transport};

/// Lists entities matching `filter`, sorted by ascending id.
pub async fn list_entities<T: Transport>(
    client: &mut ApiClient<T>,
    filter: ComponentFilter,
) -> Result<Vec<EntityInfo>> {
    let response = client.call(&Request::list_entities(filter)).await?;

    let mut entities = response.entities;
    entities.sort_by_key(|e| e.entity_id);
    Ok(entities)
}

/// Creates a bare entity. The reply does not carry the new id; re-list to find it.
pub async fn create_entity<T: Transport>(client: &mut ApiClient<T>) -> Result<Response> {
    client.call(&Request::create_entity()).await
}

/// Fetches one component. `Ok(None)` means the entity has no component of that
/// kind, which the server reports the same way as any other refusal.
pub async fn get_component<T: Transport>(
    client: &mut ApiClient<T>,
    entity_id: EntityId,
    kind: ComponentKind,
) -> Result<Option<Component>> {
    let response = client.send(&Request::get_component(entity_id, kind)).await?;

    if !response.success {
        return Ok(None);
    }

    match response.component {
        Some(component) if component.kind() != kind => Err(ApiError::protocol(format!(
            "asked for {} but received {}",
            kind.label(),
            component.kind().label()
        ))),
        component => Ok(component),
    }
}

pub async fn add_component<T: Transport>(
    client: &mut ApiClient<T>,
    entity_id: EntityId,
    component: Component,
) -> Result<Response> {
    validate(&component)?;
    client
        .call(&Request::add_component(entity_id, component))
        .await
}

pub async fn edit_component<T: Transport>(
    client: &mut ApiClient<T>,
    entity_id: EntityId,
    component: Component,
) -> Result<Response> {
    validate(&component)?;
    client
        .call(&Request::edit_component(entity_id, component))
        .await
}

fn validate(component: &Component) -> Result<()> {
    match component {
        Component::Model(model) if model.path.trim().is_empty() => {
            Err(ApiError::invalid_input("Model path required"))
        }
        Component::Positionable(p) => {
            let finite = p
                .position
                .iter()
                .chain(&p.rotation)
                .chain(&p.origin)
                .chain(std::iter::once(&p.scale))
                .all(|v| v.is_finite());
            if finite {
                Ok(())
            } else {
                Err(ApiError::invalid_input("Positionable values must be finite"))
            }
        }
        Component::Model(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeServer;
    use crate::types::{Model, Positionable};
    use crate::MessageType;

    fn positionable_at(x: f32) -> Positionable {
        Positionable {
            position: [x, 0.0, 0.0],
            ..Positionable::default()
        }
    }

    #[tokio::test]
    async fn test_list_entities_sorted_and_filtered() {
        let server = FakeServer::new()
            .with_entity(5, Some(positionable_at(1.0)), None)
            .with_entity(2, None, Some(Model::new("a.glb")))
            .with_entity(9, Some(positionable_at(2.0)), Some(Model::new("b.glb")));
        let mut client = ApiClient::with_transport(server);

        let all = list_entities(&mut client, ComponentFilter::Any).await.unwrap();
        let ids: Vec<_> = all.iter().map(|e| e.entity_id).collect();
        assert_eq!(ids, vec![2, 5, 9]);

        let models = list_entities(&mut client, ComponentFilter::Model).await.unwrap();
        let ids: Vec<_> = models.iter().map(|e| e.entity_id).collect();
        assert_eq!(ids, vec![2, 9]);
        assert!(models[1].has(ComponentKind::Positionable));
    }

    #[tokio::test]
    async fn test_get_component_absent_is_none() {
        let server = FakeServer::new().with_entity(4, Some(positionable_at(3.0)), None);
        let mut client = ApiClient::with_transport(server);

        let model = get_component(&mut client, 4, ComponentKind::Model).await.unwrap();
        assert!(model.is_none());

        let positionable = get_component(&mut client, 4, ComponentKind::Positionable)
            .await
            .unwrap();
        assert_eq!(positionable, Some(Component::Positionable(positionable_at(3.0))));
    }

    #[tokio::test]
    async fn test_create_then_add_then_edit() {
        let server = FakeServer::new();
        let mut client = ApiClient::with_transport(server.clone());

        create_entity(&mut client).await.unwrap();
        let id = list_entities(&mut client, ComponentFilter::Any).await.unwrap()[0].entity_id;

        add_component(&mut client, id, Model::new("tree.glb").into()).await.unwrap();
        // Adding twice is refused by the server.
        let err = add_component(&mut client, id, Model::new("tree.glb").into())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::OperationFailed {
                operation: MessageType::AddComponent,
                ..
            }
        ));

        edit_component(&mut client, id, Model::new("rock.glb").into()).await.unwrap();
        assert_eq!(
            server.component(id, ComponentKind::Model),
            Some(Component::Model(Model::new("rock.glb")))
        );
    }

    #[tokio::test]
    async fn test_edit_missing_component_fails() {
        let server = FakeServer::new().with_entity(1, None, None);
        let mut client = ApiClient::with_transport(server);

        let err = edit_component(&mut client, 1, positionable_at(0.0).into())
            .await
            .unwrap_err();
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_empty_model_path_never_reaches_the_server() {
        let server = FakeServer::new().with_entity(1, None, None);
        let mut client = ApiClient::with_transport(server.clone());

        let err = add_component(&mut client, 1, Model::new("  ").into())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_non_finite_positionable_is_rejected_locally() {
        let server = FakeServer::new().with_entity(1, Some(Positionable::default()), None);
        let mut client = ApiClient::with_transport(server.clone());

        let component = Positionable {
            scale: f32::NAN,
            ..Positionable::default()
        };
        let err = edit_component(&mut client, 1, component.into()).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert!(server.requests().is_empty());
    }
}
