use uuid::Uuid;

/// Header carrying the request correlation id, both ways.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request context, inserted by [`crate::middleware::request_context_middleware`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: Uuid,
}

impl RequestContext {
    pub fn new(request_id: Uuid) -> Self {
        Self { request_id }
    }

    /// A context with a freshly generated id.
    pub fn generate() -> Self {
        Self::new(Uuid::now_v7())
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }
}
