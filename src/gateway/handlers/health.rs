/// Root health line
///
/// GET /
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is up")),
    tag = "Health"
)]
pub async fn root() -> &'static str {
    "diagnostic test booking service is running"
}
