//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use regdesk_core::{FieldError, RegistrationResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Regdesk API",
        version = "0.1.0",
        description = "Student registration intake. A submission carries five text fields and two PDF documents; both documents are stored with public read links before one row is appended to the registration table."
    ),
    paths(
        handlers::registration::register,
        handlers::health::root,
        handlers::health::health_check,
    ),
    components(
        schemas(
            RegistrationResponse,
            FieldError,
            handlers::health::RootResponse,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "registration", description = "Registration submission"),
        (name = "config", description = "Service banner and health checks")
    )
)]
pub struct ApiDoc;
