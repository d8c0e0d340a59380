use crate::types::{ActionId, Range, Request, Response};
use crate::{ApiClient, ApiError, Result, Transport};

/// Adds voxels at integer coordinates. With `replace`, the given set becomes
/// the whole voxel set, so an empty slice with `replace` clears everything.
pub async fn add_voxels<T: Transport>(
    client: &mut ApiClient<T>,
    voxels: &[[i32; 3]],
    replace: bool,
    size: f32,
) -> Result<Response> {
    client
        .call(&Request::add_voxels(voxels.to_vec(), replace, size))
        .await
}

/// Asks the server to stage clearing a box. Nothing is removed until the
/// returned action id is passed to [`confirm_action`]. Each range may be given
/// in either order.
pub async fn clear_voxels<T: Transport>(
    client: &mut ApiClient<T>,
    x: impl Into<Range>,
    y: impl Into<Range>,
    z: impl Into<Range>,
) -> Result<ActionId> {
    let response = client.call(&Request::clear_voxels(x, y, z)).await?;

    response
        .action_id
        .ok_or_else(|| ApiError::protocol("CLEAR_VOXELS succeeded without an actionId"))
}

/// Commits a pending action. Unknown, expired, or already confirmed ids come
/// back as [`ApiError::OperationFailed`].
pub async fn confirm_action<T: Transport>(
    client: &mut ApiClient<T>,
    action_id: ActionId,
) -> Result<Response> {
    client.call(&Request::confirm_action(action_id)).await
}
