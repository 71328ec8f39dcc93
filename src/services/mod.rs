//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod registration_service;

pub use registration_service::{RegistrationService, RegistrationWorkflow};

#[cfg(any(test, feature = "test-utils"))]
pub use registration_service::MockRegistrationService;
