use axum::Json;

use crate::auth::CurrentUser;
use crate::domain::User;

#[utoipa::path(
    get,
    path = "/api/user",
    responses(
        (status = 200, description = "The current user"),
        (status = 401, description = "Unknown x-user-id")
    )
)]
pub async fn get_current_user(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
