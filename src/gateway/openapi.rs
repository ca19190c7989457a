//! OpenAPI / Swagger UI documentation.
//!
//! - Swagger UI: `http://localhost:5000/swagger-ui`
//! - OpenAPI JSON: `http://localhost:5000/api-docs/openapi.json`

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::handlers::{AdminStatus, TokenResponse};
use crate::booking::BookingRequest;
use crate::gateway::handlers::payment::{CreateIntentRequest, CreateIntentResponse};
use crate::store::{Banner, BookedTest, NewTestResult, NewUser, Test, TestResult, TestSpec, User};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Labbooker API",
        version = "1.0.0",
        description = "Booking backend for a diagnostic-test center.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::root,
        crate::auth::handlers::issue_token,
        crate::auth::handlers::admin_status,
        crate::auth::handlers::promote_user,
        crate::auth::handlers::logged_user,
        crate::auth::handlers::list_users,
        crate::auth::handlers::create_user,
        crate::gateway::handlers::tests::list_tests,
        crate::gateway::handlers::tests::get_test,
        crate::gateway::handlers::tests::create_test,
        crate::gateway::handlers::tests::update_test,
        crate::gateway::handlers::tests::delete_test,
        crate::gateway::handlers::results::my_results,
        crate::gateway::handlers::results::submit_result,
        crate::gateway::handlers::bookings::submit_booking,
        crate::gateway::handlers::bookings::my_bookings,
        crate::gateway::handlers::bookings::cancel_booking,
        crate::gateway::handlers::bookings::list_reservations,
        crate::gateway::handlers::banners::list_banners,
        crate::gateway::handlers::banners::create_banner,
        crate::gateway::handlers::banners::delete_banner,
        crate::gateway::handlers::payment::create_payment_intent,
    ),
    components(
        schemas(
            TokenResponse,
            AdminStatus,
            User,
            NewUser,
            Test,
            TestSpec,
            BookedTest,
            BookingRequest,
            TestResult,
            NewTestResult,
            Banner,
            CreateIntentRequest,
            CreateIntentResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Identity token issuance"),
        (name = "Users", description = "User lookup and role management"),
        (name = "Tests", description = "Diagnostic test catalog"),
        (name = "Bookings", description = "Reservations and slot inventory"),
        (name = "Results", description = "Administered test results"),
        (name = "Banners", description = "Promotional banners"),
        (name = "Payments", description = "Payment intent creation"),
        (name = "Health", description = "Liveness")
    )
)]
pub struct ApiDoc;
